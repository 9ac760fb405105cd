//! The stages of the storefront shipping chain

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::StageId;

/// Country, then subdivision, then shipping method.
///
/// Each stage's options depend on the selections of the stages before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStage {
    Country,
    Subdivision,
    #[serde(rename = "shipping")]
    ShippingMethod,
}

impl ShippingStage {
    /// All stages, in chain order.
    pub const ALL: [ShippingStage; 3] = [Self::Country, Self::Subdivision, Self::ShippingMethod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Subdivision => "subdivision",
            Self::ShippingMethod => "shipping",
        }
    }

    pub fn stage_id(&self) -> StageId {
        StageId::from(self.as_str())
    }

    /// Stage ids for a new shipping chain.
    pub fn chain_ids() -> Vec<StageId> {
        Self::ALL.iter().map(ShippingStage::stage_id).collect()
    }
}

impl fmt::Display for ShippingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingStage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "country" => Ok(Self::Country),
            "subdivision" => Ok(Self::Subdivision),
            "shipping" => Ok(Self::ShippingMethod),
            other => Err(DomainError::validation(format!(
                "unknown shipping stage: {}",
                other
            ))),
        }
    }
}

impl TryFrom<&StageId> for ShippingStage {
    type Error = DomainError;

    fn try_from(id: &StageId) -> Result<Self, Self::Error> {
        id.as_str().parse()
    }
}
