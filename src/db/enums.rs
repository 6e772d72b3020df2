use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which profile(s) a user holds. Replaces "does the user have a
/// tech_profile / recruiter_profile row" probing with an explicit variant
/// checked at save time.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "capability_enum")]
pub enum Capability {
    #[sea_orm(string_value = "NONE")]
    None,
    #[sea_orm(string_value = "TECH")]
    Tech,
    #[sea_orm(string_value = "RECRUITER")]
    Recruiter,
    #[sea_orm(string_value = "BOTH")]
    Both,
}

impl Capability {
    pub fn has_tech(&self) -> bool {
        matches!(self, Capability::Tech | Capability::Both)
    }

    pub fn has_recruiter(&self) -> bool {
        matches!(self, Capability::Recruiter | Capability::Both)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
