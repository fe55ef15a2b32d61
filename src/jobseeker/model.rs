use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;
use super::scalar::{Flag, Scalar};

/// One registered jobseeker as returned by the record source.
///
/// Identity, audit metadata and the indexed classification columns live at the top
/// level. Everything captured by the registration form lives in nine optional
/// sub-documents; any of them may be missing or partially filled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Jobseeker {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub created_by: Option<String>,

    // Indexed copies used for filtering
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub surname: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub sex: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub employment_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_ofw: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_4ps: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub province: Option<String>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub employment: Option<Employment>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub job_preference: Option<JobPreference>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub language: Option<Language>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub education: Option<Education>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub training: Option<Training>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub eligibility: Option<Eligibility>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub work_experience: Option<WorkExperience>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub skills: Option<Skills>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub surname: Option<Scalar>,
    pub first_name: Option<Scalar>,
    pub middle_name: Option<Scalar>,
    pub suffix: Option<Scalar>,
    pub date_of_birth: Option<Scalar>,
    pub place_of_birth: Option<Scalar>,
    pub sex: Option<Scalar>,
    pub civil_status: Option<Scalar>,
    pub religion: Option<Scalar>,
    pub tin: Option<Scalar>,
    pub height: Option<Scalar>,
    pub contact_number: Option<Scalar>,
    pub email: Option<Scalar>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub address: Option<Address>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub disability: Option<Disability>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub house_street: Option<Scalar>,
    pub barangay: Option<Scalar>,
    pub city: Option<Scalar>,
    pub province: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Disability {
    pub visual: Flag,
    pub hearing: Flag,
    pub speech: Flag,
    pub physical: Flag,
    pub mental: Flag,
    pub others: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Employment {
    pub status: Option<Scalar>,
    pub employed_type: Option<Scalar>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub self_employed: Option<SelfEmployment>,
    pub unemployed_reason: Option<Scalar>,
    pub unemployed_reason_other: Option<Scalar>,
    pub months_looking: Option<Scalar>,
    pub terminated_abroad_country: Option<Scalar>,
    pub ofw_country: Option<Scalar>,
    pub former_ofw: Flag,
    pub former_ofw_country: Option<Scalar>,
    pub former_ofw_return: Option<Scalar>,
    pub household_id_4ps: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfEmployment {
    pub fisherman: Flag,
    pub vendor: Flag,
    pub home_based: Flag,
    pub transport: Flag,
    pub domestic_worker: Flag,
    pub freelancer: Flag,
    pub artisan: Flag,
    pub others: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPreference {
    pub employment_type: Option<Scalar>,
    #[serde(deserialize_with = "lenient::entries")]
    pub occupations: Vec<Option<Scalar>>,
    #[serde(deserialize_with = "lenient::entries")]
    pub local_locations: Vec<Option<Scalar>>,
    #[serde(deserialize_with = "lenient::entries")]
    pub overseas_locations: Vec<Option<Scalar>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    #[serde(deserialize_with = "lenient::or_default")]
    pub english: Option<LanguageSkills>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub filipino: Option<LanguageSkills>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub mandarin: Option<LanguageSkills>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub other: Option<LanguageSkills>,
    pub other_language: Option<Scalar>,
}

impl Language {
    /// Proficiency blocks in export order: English, Filipino, Mandarin, other.
    pub fn skills(&self, slot: usize) -> Option<&LanguageSkills> {
        match slot {
            0 => self.english.as_ref(),
            1 => self.filipino.as_ref(),
            2 => self.mandarin.as_ref(),
            3 => self.other.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSkills {
    pub read: Flag,
    pub write: Flag,
    pub speak: Flag,
    pub understand: Flag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub currently_in_school: Flag,
    #[serde(deserialize_with = "lenient::or_default")]
    pub elementary: Option<EducationLevel>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub secondary_non_k12: Option<EducationLevel>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub secondary_k12: Option<EducationLevel>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub senior_high: Option<EducationLevel>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub tertiary: Option<EducationLevel>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub graduate: Option<EducationLevel>,
}

impl Education {
    /// Levels in export order, from elementary to graduate studies.
    pub fn level(&self, slot: usize) -> Option<&EducationLevel> {
        match slot {
            0 => self.elementary.as_ref(),
            1 => self.secondary_non_k12.as_ref(),
            2 => self.secondary_k12.as_ref(),
            3 => self.senior_high.as_ref(),
            4 => self.tertiary.as_ref(),
            5 => self.graduate.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationLevel {
    pub course: Option<Scalar>,
    pub year_graduated: Option<Scalar>,
    pub level_reached: Option<Scalar>,
    pub year_last_attended: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Training {
    #[serde(deserialize_with = "lenient::entries")]
    pub entries: Vec<Option<TrainingEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingEntry {
    pub course: Option<Scalar>,
    pub hours: Option<Scalar>,
    pub institution: Option<Scalar>,
    pub skills_acquired: Option<Scalar>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub certificates: Option<Certificates>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Certificates {
    #[serde(rename = "NC_I")]
    pub nc_i: Flag,
    #[serde(rename = "NC_II")]
    pub nc_ii: Flag,
    #[serde(rename = "NC_III")]
    pub nc_iii: Flag,
    #[serde(rename = "NC_IV")]
    pub nc_iv: Flag,
    #[serde(rename = "COC")]
    pub coc: Flag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Eligibility {
    #[serde(rename = "civilService")]
    #[serde(deserialize_with = "lenient::entries")]
    pub civil_service: Vec<Option<CivilServiceEntry>>,
    #[serde(rename = "professionalLicense")]
    #[serde(deserialize_with = "lenient::entries")]
    pub professional_license: Vec<Option<LicenseEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CivilServiceEntry {
    pub name: Option<Scalar>,
    #[serde(alias = "dateTaken")]
    pub date_taken: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseEntry {
    pub name: Option<Scalar>,
    #[serde(alias = "validUntil")]
    pub valid_until: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    #[serde(deserialize_with = "lenient::entries")]
    pub entries: Vec<Option<WorkEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkEntry {
    pub company: Option<Scalar>,
    pub address: Option<Scalar>,
    pub position: Option<Scalar>,
    pub months: Option<Scalar>,
    pub status: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub auto_mechanic: Flag,
    pub beautician: Flag,
    pub carpentry: Flag,
    pub computer_literate: Flag,
    pub domestic_chores: Flag,
    pub driver: Flag,
    pub electrician: Flag,
    pub embroidery: Flag,
    pub gardening: Flag,
    pub masonry: Flag,
    pub painter_artist: Flag,
    pub painting_jobs: Flag,
    pub photography: Flag,
    pub plumbing: Flag,
    pub sewing_dresses: Flag,
    pub stenography: Flag,
    pub tailoring: Flag,
    pub others: Option<Scalar>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub certification: Option<Certification>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub referral: Option<Referral>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub acknowledged: Flag,
    pub date_signed: Option<Scalar>,
}

/// PESO programs the jobseeker was referred to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Referral {
    pub spes: Flag,
    pub gip: Flag,
    pub tupad: Flag,
    pub jobstart: Flag,
    pub dileep: Flag,
    pub tesda_training: Flag,
    pub others: Option<Scalar>,
}

impl Jobseeker {
    pub fn address(&self) -> Option<&Address> {
        self.personal_info.as_ref()?.address.as_ref()
    }

    pub fn training_entry(&self, slot: usize) -> Option<&TrainingEntry> {
        self.training.as_ref()?.entries.get(slot)?.as_ref()
    }

    pub fn civil_service_entry(&self, slot: usize) -> Option<&CivilServiceEntry> {
        self.eligibility.as_ref()?.civil_service.get(slot)?.as_ref()
    }

    pub fn license_entry(&self, slot: usize) -> Option<&LicenseEntry> {
        self.eligibility.as_ref()?.professional_license.get(slot)?.as_ref()
    }

    pub fn work_entry(&self, slot: usize) -> Option<&WorkEntry> {
        self.work_experience.as_ref()?.entries.get(slot)?.as_ref()
    }

    pub fn occupation(&self, slot: usize) -> Option<&Scalar> {
        self.job_preference.as_ref()?.occupations.get(slot)?.as_ref()
    }

    pub fn local_location(&self, slot: usize) -> Option<&Scalar> {
        self.job_preference.as_ref()?.local_locations.get(slot)?.as_ref()
    }

    pub fn overseas_location(&self, slot: usize) -> Option<&Scalar> {
        self.job_preference.as_ref()?.overseas_locations.get(slot)?.as_ref()
    }
}
