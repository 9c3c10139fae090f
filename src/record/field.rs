// src/record/field.rs

use anyhow::{anyhow, Error};
use std::{fmt, str::FromStr};

/// How a constraint on a field is matched against stored values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Case-insensitive substring containment.
    FreeText,
    /// Exact equality against a dropdown choice.
    ExactChoice,
    /// Operator-aware comparison such as `>=120`.
    Numeric,
}

/// The closed set of fields a constraint can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Key,
    PinCode1,
    PinCode2,
    OrganizationName,
    Address,
    ProjectName,
    Website,
    TotalFsi,
    Commissionerate,
    Division,
    Range,
    Pro,
    OrganizationType,
    Pex,
    AreaShare,
    RevenueShare,
    Fy,
}

impl Field {
    pub const ALL: [Field; 17] = [
        Field::Key,
        Field::PinCode1,
        Field::PinCode2,
        Field::OrganizationName,
        Field::Address,
        Field::ProjectName,
        Field::Website,
        Field::TotalFsi,
        Field::Commissionerate,
        Field::Division,
        Field::Range,
        Field::Pro,
        Field::OrganizationType,
        Field::Pex,
        Field::AreaShare,
        Field::RevenueShare,
        Field::Fy,
    ];

    /// The record key this field is stored under.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Key => "Key",
            Field::PinCode1 => "pin_code_1",
            Field::PinCode2 => "pin_code_2",
            Field::OrganizationName => "organization_name",
            Field::Address => "address",
            Field::ProjectName => "Project Name",
            Field::Website => "Website",
            Field::TotalFsi => "Total_fsi",
            Field::Commissionerate => "Commissionerate",
            Field::Division => "Division",
            Field::Range => "Range",
            Field::Pro => "Pro",
            Field::OrganizationType => "organization_type",
            Field::Pex => "Pex",
            Field::AreaShare => "Area_share",
            Field::RevenueShare => "Revenue Share",
            Field::Fy => "FY",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Key
            | Field::PinCode1
            | Field::PinCode2
            | Field::OrganizationName
            | Field::Address
            | Field::ProjectName
            | Field::Website => FieldKind::FreeText,
            Field::TotalFsi => FieldKind::Numeric,
            Field::Commissionerate
            | Field::Division
            | Field::Range
            | Field::Pro
            | Field::OrganizationType
            | Field::Pex
            | Field::AreaShare
            | Field::RevenueShare
            | Field::Fy => FieldKind::ExactChoice,
        }
    }

    pub fn is_jurisdiction(&self) -> bool {
        matches!(self, Field::Commissionerate | Field::Division | Field::Range)
    }

    /// Fields bound to dropdowns, in display order.
    pub fn exact_choice() -> impl Iterator<Item = Field> {
        Field::ALL
            .into_iter()
            .filter(|f| f.kind() == FieldKind::ExactChoice)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = Error;

    /// Accepts the record key (`Project Name`) as well as the widget ids the
    /// page used (`Project_Name`, `organizationType`, `areaShare`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        let field = match normalized.as_str() {
            "key" => Field::Key,
            "pincode1" => Field::PinCode1,
            "pincode2" => Field::PinCode2,
            "organizationname" => Field::OrganizationName,
            "address" => Field::Address,
            "projectname" => Field::ProjectName,
            "website" => Field::Website,
            "totalfsi" => Field::TotalFsi,
            "commissionerate" => Field::Commissionerate,
            "division" => Field::Division,
            "range" => Field::Range,
            "pro" => Field::Pro,
            "organizationtype" => Field::OrganizationType,
            "pex" => Field::Pex,
            "areashare" => Field::AreaShare,
            "revenueshare" => Field::RevenueShare,
            "fy" => Field::Fy,
            _ => return Err(anyhow!("unknown field {:?}", s)),
        };
        Ok(field)
    }
}
