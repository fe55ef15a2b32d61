//! The fixed, ordered column layout of the jobseeker CSV file.
//!
//! Column position is the contract with spreadsheet consumers: inserting, removing or
//! reordering entries here changes the file format.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use once_cell::sync::Lazy;

use super::escape::{escape, escape_str};
use crate::config::config;
use crate::jobseeker::{
    Certificates, Disability, Flag, Jobseeker, LanguageSkills, Referral, Scalar, SelfEmployment, Skills,
};

/// One rendered cell. Flag columns borrow their `Yes`/`No` literals.
pub type Cell = Cow<'static, str>;

pub type FieldFn = fn(&Jobseeker) -> Cell;
pub type SlotFn = fn(&Jobseeker, usize) -> Cell;

const EMPTY: Cell = Cow::Borrowed("");

/// Reads one cell out of a record. Slot accessors carry the index of the repeated
/// entry (or language / education level) they address.
#[derive(Clone, Copy)]
pub enum Accessor {
    Field(FieldFn),
    Slot(SlotFn, usize),
}

impl Accessor {
    pub fn read(&self, record: &Jobseeker) -> Cell {
        match self {
            Accessor::Field(f) => f(record),
            Accessor::Slot(f, slot) => f(record, *slot),
        }
    }
}

pub struct Column {
    pub header: Cow<'static, str>,
    pub accessor: Accessor,
}

impl Column {
    pub fn read(&self, record: &Jobseeker) -> Cell {
        self.accessor.read(record)
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column").field("header", &self.header).finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.header.as_ref())
    }

    /// Comma-joined headers. Headers are fixed literals and never need escaping.
    pub fn header_line(&self) -> String {
        self.headers().collect::<Vec<_>>().join(",")
    }

    pub fn position(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.header == header)
    }

    pub fn field(mut self, header: &'static str, accessor: FieldFn) -> Self {
        self.columns.push(Column { header: Cow::Borrowed(header), accessor: Accessor::Field(accessor) });
        self
    }

    /// `"{prefix} 1"`, `"{prefix} 2"`, ... one column per slot.
    pub fn numbered(mut self, prefix: &str, count: usize, accessor: SlotFn) -> Self {
        for slot in 0..count {
            self.columns.push(Column {
                header: Cow::Owned(format!("{} {}", prefix, slot + 1)),
                accessor: Accessor::Slot(accessor, slot),
            });
        }
        self
    }

    /// Every field for the first label, then every field for the second, and so on.
    /// Headers read `"{label} - {field}"`; the label's position is the slot index.
    pub fn group<L: AsRef<str>>(mut self, labels: &[L], fields: &[(&str, SlotFn)]) -> Self {
        for (slot, label) in labels.iter().enumerate() {
            for (name, accessor) in fields {
                self.columns.push(Column {
                    header: Cow::Owned(format!("{} - {}", label.as_ref(), name)),
                    accessor: Accessor::Slot(*accessor, slot),
                });
            }
        }
        self
    }
}

impl<'a> IntoIterator for &'a ColumnRegistry {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Number of reserved slots per repeated group. Entries past these are not exported.
pub const TRAINING_SLOTS: usize = 3;
pub const CIVIL_SERVICE_SLOTS: usize = 3;
pub const LICENSE_SLOTS: usize = 3;
pub const WORK_EXPERIENCE_SLOTS: usize = 5;
pub const PREFERENCE_SLOTS: usize = 3;

pub static JOBSEEKER_COLUMNS: Lazy<ColumnRegistry> = Lazy::new(jobseeker_columns);

fn text(value: Option<&Scalar>) -> Cell {
    match value {
        None => EMPTY,
        Some(v) => Cow::Owned(escape(Some(v))),
    }
}

fn text_or(value: Option<&Scalar>, indexed: Option<&String>) -> Cell {
    match value.filter(|v| !v.is_blank()) {
        Some(v) => text(Some(v)),
        None => indexed.map_or(EMPTY, |s| Cow::Owned(escape_str(s))),
    }
}

fn yes_no(set: bool) -> Cell {
    Cow::Borrowed(Flag(set).yes_no())
}

/// `""` when the enclosing document is absent, otherwise `Yes`/`No`; a missing inner
/// block counts as unchecked.
fn flag_in<T>(parent_present: bool, inner: Option<&T>, get: fn(&T) -> Flag) -> Cell {
    if !parent_present {
        return EMPTY;
    }
    yes_no(inner.is_some_and(|t| get(t).is_set()))
}

/// Audit timestamps, e.g. `2024-03-01 10:30:00`. The format has no separators or
/// quotes, so these cells are not escaped.
pub const AUDIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_audit_date(ts: &DateTime<Utc>, offset: &FixedOffset) -> String {
    ts.with_timezone(offset).format(AUDIT_DATE_FORMAT).to_string()
}

fn audit_date(value: Option<&DateTime<Utc>>) -> Cell {
    let Some(ts) = value else { return EMPTY };
    Cow::Owned(format_audit_date(ts, &config().export.offset()))
}

fn disability(r: &Jobseeker, get: fn(&Disability) -> Flag) -> Cell {
    let info = r.personal_info.as_ref();
    flag_in(info.is_some(), info.and_then(|p| p.disability.as_ref()), get)
}

fn self_employed(r: &Jobseeker, get: fn(&SelfEmployment) -> Flag) -> Cell {
    let employment = r.employment.as_ref();
    flag_in(employment.is_some(), employment.and_then(|e| e.self_employed.as_ref()), get)
}

fn language(r: &Jobseeker, slot: usize, get: fn(&LanguageSkills) -> Flag) -> Cell {
    let language = r.language.as_ref();
    flag_in(language.is_some(), language.and_then(|l| l.skills(slot)), get)
}

fn certificate(r: &Jobseeker, slot: usize, get: fn(&Certificates) -> Flag) -> Cell {
    let entry = r.training_entry(slot);
    flag_in(entry.is_some(), entry.and_then(|e| e.certificates.as_ref()), get)
}

fn skill(r: &Jobseeker, get: fn(&Skills) -> Flag) -> Cell {
    let skills = r.skills.as_ref();
    flag_in(skills.is_some(), skills, get)
}

fn referral(r: &Jobseeker, get: fn(&Referral) -> Flag) -> Cell {
    let skills = r.skills.as_ref();
    flag_in(skills.is_some(), skills.and_then(|s| s.referral.as_ref()), get)
}

fn jobseeker_columns() -> ColumnRegistry {
    let training_labels: Vec<String> = (1..=TRAINING_SLOTS).map(|n| format!("Training {}", n)).collect();
    let training_fields: [(&str, SlotFn); 9] = [
        ("Course", |r, i| text(r.training_entry(i).and_then(|e| e.course.as_ref()))),
        ("Hours", |r, i| text(r.training_entry(i).and_then(|e| e.hours.as_ref()))),
        ("Institution", |r, i| text(r.training_entry(i).and_then(|e| e.institution.as_ref()))),
        ("Skills Acquired", |r, i| text(r.training_entry(i).and_then(|e| e.skills_acquired.as_ref()))),
        ("NC I", |r, i| certificate(r, i, |c| c.nc_i)),
        ("NC II", |r, i| certificate(r, i, |c| c.nc_ii)),
        ("NC III", |r, i| certificate(r, i, |c| c.nc_iii)),
        ("NC IV", |r, i| certificate(r, i, |c| c.nc_iv)),
        ("COC", |r, i| certificate(r, i, |c| c.coc)),
    ];

    let civil_labels: Vec<String> = (1..=CIVIL_SERVICE_SLOTS).map(|n| format!("Civil Service {}", n)).collect();
    let civil_fields: [(&str, SlotFn); 2] = [
        ("Name", |r, i| text(r.civil_service_entry(i).and_then(|e| e.name.as_ref()))),
        ("Date Taken", |r, i| text(r.civil_service_entry(i).and_then(|e| e.date_taken.as_ref()))),
    ];

    let license_labels: Vec<String> = (1..=LICENSE_SLOTS).map(|n| format!("Professional License {}", n)).collect();
    let license_fields: [(&str, SlotFn); 2] = [
        ("Name", |r, i| text(r.license_entry(i).and_then(|e| e.name.as_ref()))),
        ("Valid Until", |r, i| text(r.license_entry(i).and_then(|e| e.valid_until.as_ref()))),
    ];

    let work_labels: Vec<String> = (1..=WORK_EXPERIENCE_SLOTS).map(|n| format!("Work Experience {}", n)).collect();
    let work_fields: [(&str, SlotFn); 5] = [
        ("Company", |r, i| text(r.work_entry(i).and_then(|e| e.company.as_ref()))),
        ("Address", |r, i| text(r.work_entry(i).and_then(|e| e.address.as_ref()))),
        ("Position", |r, i| text(r.work_entry(i).and_then(|e| e.position.as_ref()))),
        ("Months", |r, i| text(r.work_entry(i).and_then(|e| e.months.as_ref()))),
        ("Status", |r, i| text(r.work_entry(i).and_then(|e| e.status.as_ref()))),
    ];

    let language_fields: [(&str, SlotFn); 4] = [
        ("Read", |r, i| language(r, i, |s| s.read)),
        ("Write", |r, i| language(r, i, |s| s.write)),
        ("Speak", |r, i| language(r, i, |s| s.speak)),
        ("Understand", |r, i| language(r, i, |s| s.understand)),
    ];

    let education_fields: [(&str, SlotFn); 4] = [
        ("Course", |r, i| text(r.education.as_ref().and_then(|e| e.level(i)).and_then(|l| l.course.as_ref()))),
        ("Year Graduated", |r, i| {
            text(r.education.as_ref().and_then(|e| e.level(i)).and_then(|l| l.year_graduated.as_ref()))
        }),
        ("Level Reached", |r, i| {
            text(r.education.as_ref().and_then(|e| e.level(i)).and_then(|l| l.level_reached.as_ref()))
        }),
        ("Year Last Attended", |r, i| {
            text(r.education.as_ref().and_then(|e| e.level(i)).and_then(|l| l.year_last_attended.as_ref()))
        }),
    ];

    ColumnRegistry::new()
        // Identity
        .field("ID", |r| Cow::Owned(r.id.to_string()))
        .field("Surname", |r| {
            text_or(r.personal_info.as_ref().and_then(|p| p.surname.as_ref()), r.surname.as_ref())
        })
        .field("First Name", |r| {
            text_or(r.personal_info.as_ref().and_then(|p| p.first_name.as_ref()), r.first_name.as_ref())
        })
        .field("Middle Name", |r| text(r.personal_info.as_ref().and_then(|p| p.middle_name.as_ref())))
        .field("Suffix", |r| text(r.personal_info.as_ref().and_then(|p| p.suffix.as_ref())))
        // Personal information
        .field("Date of Birth", |r| text(r.personal_info.as_ref().and_then(|p| p.date_of_birth.as_ref())))
        .field("Place of Birth", |r| text(r.personal_info.as_ref().and_then(|p| p.place_of_birth.as_ref())))
        .field("Sex", |r| text_or(r.personal_info.as_ref().and_then(|p| p.sex.as_ref()), r.sex.as_ref()))
        .field("Civil Status", |r| text(r.personal_info.as_ref().and_then(|p| p.civil_status.as_ref())))
        .field("Religion", |r| text(r.personal_info.as_ref().and_then(|p| p.religion.as_ref())))
        .field("TIN", |r| text(r.personal_info.as_ref().and_then(|p| p.tin.as_ref())))
        .field("Height", |r| text(r.personal_info.as_ref().and_then(|p| p.height.as_ref())))
        // Address
        .field("House No./Street", |r| text(r.address().and_then(|a| a.house_street.as_ref())))
        .field("Barangay", |r| text(r.address().and_then(|a| a.barangay.as_ref())))
        .field("City/Municipality", |r| text_or(r.address().and_then(|a| a.city.as_ref()), r.city.as_ref()))
        .field("Province", |r| text_or(r.address().and_then(|a| a.province.as_ref()), r.province.as_ref()))
        // Disability
        .field("Disability - Visual", |r| disability(r, |d| d.visual))
        .field("Disability - Hearing", |r| disability(r, |d| d.hearing))
        .field("Disability - Speech", |r| disability(r, |d| d.speech))
        .field("Disability - Physical", |r| disability(r, |d| d.physical))
        .field("Disability - Mental", |r| disability(r, |d| d.mental))
        .field("Disability - Others", |r| {
            text(r.personal_info.as_ref().and_then(|p| p.disability.as_ref()).and_then(|d| d.others.as_ref()))
        })
        // Contact
        .field("Contact Number", |r| text(r.personal_info.as_ref().and_then(|p| p.contact_number.as_ref())))
        .field("Email", |r| text(r.personal_info.as_ref().and_then(|p| p.email.as_ref())))
        // Employment status
        .field("Employment Status", |r| text(r.employment.as_ref().and_then(|e| e.status.as_ref())))
        .field("Employed Type", |r| text(r.employment.as_ref().and_then(|e| e.employed_type.as_ref())))
        .field("Unemployed Reason", |r| text(r.employment.as_ref().and_then(|e| e.unemployed_reason.as_ref())))
        .field("Unemployed Reason - Others", |r| {
            text(r.employment.as_ref().and_then(|e| e.unemployed_reason_other.as_ref()))
        })
        .field("Months Looking for Work", |r| text(r.employment.as_ref().and_then(|e| e.months_looking.as_ref())))
        .field("Terminated Abroad Country", |r| {
            text(r.employment.as_ref().and_then(|e| e.terminated_abroad_country.as_ref()))
        })
        // Self-employment
        .field("Self-Employed - Fisherman/Fisherfolk", |r| self_employed(r, |s| s.fisherman))
        .field("Self-Employed - Vendor/Retailer", |r| self_employed(r, |s| s.vendor))
        .field("Self-Employed - Home-based Worker", |r| self_employed(r, |s| s.home_based))
        .field("Self-Employed - Transport", |r| self_employed(r, |s| s.transport))
        .field("Self-Employed - Domestic Worker", |r| self_employed(r, |s| s.domestic_worker))
        .field("Self-Employed - Freelancer", |r| self_employed(r, |s| s.freelancer))
        .field("Self-Employed - Artisan/Craft Worker", |r| self_employed(r, |s| s.artisan))
        .field("Self-Employed - Others", |r| {
            text(r.employment.as_ref().and_then(|e| e.self_employed.as_ref()).and_then(|s| s.others.as_ref()))
        })
        // OFW and 4Ps
        .field("OFW", |r| yes_no(r.is_ofw))
        .field("OFW Country", |r| text(r.employment.as_ref().and_then(|e| e.ofw_country.as_ref())))
        .field("Former OFW", |r| {
            let employment = r.employment.as_ref();
            flag_in(employment.is_some(), employment, |e| e.former_ofw)
        })
        .field("Former OFW Country", |r| text(r.employment.as_ref().and_then(|e| e.former_ofw_country.as_ref())))
        .field("Return to PH (Month/Year)", |r| {
            text(r.employment.as_ref().and_then(|e| e.former_ofw_return.as_ref()))
        })
        .field("4Ps Beneficiary", |r| yes_no(r.is_4ps))
        .field("4Ps Household ID", |r| text(r.employment.as_ref().and_then(|e| e.household_id_4ps.as_ref())))
        // Job preference
        .field("Preferred Employment Type", |r| {
            text(r.job_preference.as_ref().and_then(|j| j.employment_type.as_ref()))
        })
        .numbered("Preferred Occupation", PREFERENCE_SLOTS, |r, i| text(r.occupation(i)))
        .numbered("Preferred Local Location", PREFERENCE_SLOTS, |r, i| text(r.local_location(i)))
        .numbered("Preferred Overseas Location", PREFERENCE_SLOTS, |r, i| text(r.overseas_location(i)))
        // Language proficiency
        .group(&["English", "Filipino", "Mandarin", "Other Language"], &language_fields)
        .field("Other Language - Name", |r| text(r.language.as_ref().and_then(|l| l.other_language.as_ref())))
        // Education
        .field("Currently in School", |r| {
            let education = r.education.as_ref();
            flag_in(education.is_some(), education, |e| e.currently_in_school)
        })
        .group(
            &["Elementary", "Secondary (Non-K12)", "Secondary (K12)", "Senior High", "Tertiary", "Graduate Studies"],
            &education_fields,
        )
        // Training, eligibility, work experience
        .group(&training_labels, &training_fields)
        .group(&civil_labels, &civil_fields)
        .group(&license_labels, &license_fields)
        .group(&work_labels, &work_fields)
        // Skills checklist
        .field("Skill - Auto Mechanic", |r| skill(r, |s| s.auto_mechanic))
        .field("Skill - Beautician", |r| skill(r, |s| s.beautician))
        .field("Skill - Carpentry Work", |r| skill(r, |s| s.carpentry))
        .field("Skill - Computer Literate", |r| skill(r, |s| s.computer_literate))
        .field("Skill - Domestic Chores", |r| skill(r, |s| s.domestic_chores))
        .field("Skill - Driver", |r| skill(r, |s| s.driver))
        .field("Skill - Electrician", |r| skill(r, |s| s.electrician))
        .field("Skill - Embroidery", |r| skill(r, |s| s.embroidery))
        .field("Skill - Gardening", |r| skill(r, |s| s.gardening))
        .field("Skill - Masonry", |r| skill(r, |s| s.masonry))
        .field("Skill - Painter/Artist", |r| skill(r, |s| s.painter_artist))
        .field("Skill - Painting Jobs", |r| skill(r, |s| s.painting_jobs))
        .field("Skill - Photography", |r| skill(r, |s| s.photography))
        .field("Skill - Plumbing", |r| skill(r, |s| s.plumbing))
        .field("Skill - Sewing Dresses", |r| skill(r, |s| s.sewing_dresses))
        .field("Skill - Stenography", |r| skill(r, |s| s.stenography))
        .field("Skill - Tailoring", |r| skill(r, |s| s.tailoring))
        .field("Other Skills", |r| text(r.skills.as_ref().and_then(|s| s.others.as_ref())))
        // Certification
        .field("Certification Acknowledged", |r| {
            let skills = r.skills.as_ref();
            flag_in(skills.is_some(), skills.and_then(|s| s.certification.as_ref()), |c| c.acknowledged)
        })
        .field("Date Signed", |r| {
            text(r.skills.as_ref().and_then(|s| s.certification.as_ref()).and_then(|c| c.date_signed.as_ref()))
        })
        // PESO referral programs
        .field("Referral - SPES", |r| referral(r, |p| p.spes))
        .field("Referral - GIP", |r| referral(r, |p| p.gip))
        .field("Referral - TUPAD", |r| referral(r, |p| p.tupad))
        .field("Referral - JobStart", |r| referral(r, |p| p.jobstart))
        .field("Referral - DILEEP", |r| referral(r, |p| p.dileep))
        .field("Referral - TESDA Training", |r| referral(r, |p| p.tesda_training))
        .field("Referral - Others", |r| {
            text(r.skills.as_ref().and_then(|s| s.referral.as_ref()).and_then(|p| p.others.as_ref()))
        })
        // System
        .field("Created At", |r| audit_date(Some(&r.created_at)))
        .field("Updated At", |r| audit_date(r.updated_at.as_ref()))
        .field("Created By", |r| r.created_by.as_deref().map_or(EMPTY, |s| Cow::Owned(escape_str(s))))
}
