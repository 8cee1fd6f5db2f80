use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Classification code the service uses for products created by pipelines.
pub const PIPELINE_PRODUCT_TYPE: u64 = 1;
pub const PIPELINE_PRODUCT_DESCRIPTION: &str = "Product created automatically by pipeline";
pub const PIPELINE_ENGAGEMENT_NAME: &str = "CI/CD Engagement";
pub const PIPELINE_ENGAGEMENT_STATUS: &str = "In Progress";

/// Identifier assigned by the tracking service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ResourceId)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Product,
    Engagement,
}

impl ResourceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Product => "product",
            ResourceKind::Engagement => "engagement",
        }
    }

    /// Path segment of the collection endpoint, relative to the API base.
    pub const fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Product => "products/",
            ResourceKind::Engagement => "engagements/",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ResourceRef {
    pub id: ResourceId,
}

/// Body of a filtered list query. Other fields the service sends are ignored.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ListResponse {
    pub count: u64,
    pub results: Vec<ResourceRef>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CreatedResource {
    pub id: ResourceId,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub prod_type: u64,
    pub description: String,
}

impl NewProduct {
    pub fn for_project(name: &str) -> Self {
        NewProduct {
            name: name.to_string(),
            prod_type: PIPELINE_PRODUCT_TYPE,
            description: PIPELINE_PRODUCT_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewEngagement {
    pub product: ResourceId,
    pub name: String,
    pub status: String,
}

impl NewEngagement {
    pub fn for_product(product: ResourceId) -> Self {
        NewEngagement {
            product,
            name: PIPELINE_ENGAGEMENT_NAME.to_string(),
            status: PIPELINE_ENGAGEMENT_STATUS.to_string(),
        }
    }
}

/// Identifiers handed from the setup step to the upload steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedIds {
    pub product_id: ResourceId,
    pub engagement_id: ResourceId,
}

/// A scan report waiting to be uploaded.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanUpload {
    pub scan_type: String,
    pub file_path: PathBuf,
    pub engagement_id: ResourceId,
    pub product_id: Option<ResourceId>,
}

/// The multipart submission for the ingestion endpoint, with the report
/// content already read into memory.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportScan {
    pub scan_type: String,
    pub engagement_id: ResourceId,
    pub product_id: Option<ResourceId>,
    pub file_name: String,
    pub content: Vec<u8>,
}
