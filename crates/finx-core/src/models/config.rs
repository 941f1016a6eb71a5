//! Configuration structures for the extraction pipelines and the HTTP boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ExtractionError, FinxError};

/// Main configuration for finx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinxConfig {
    /// HTTP server configuration.
    pub server: ServerConfig,

    /// Extraction configuration shared by both pipelines.
    pub extraction: ExtractionConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Origins allowed by CORS on the upload endpoints.
    pub cors_origins: Vec<String>,

    /// Maximum accepted request body in bytes.
    pub max_upload_bytes: usize,

    /// Multipart field carrying the settlement spreadsheet.
    pub settlement_field: String,

    /// Multipart field carrying invoice PDFs (repeatable).
    pub invoice_field: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: vec![
                "http://127.0.0.1:5500".to_string(),
                "http://localhost:5500".to_string(),
            ],
            max_upload_bytes: 25 * 1024 * 1024,
            settlement_field: "excelFile".to_string(),
            invoice_field: "file".to_string(),
        }
    }
}

/// Extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Brand name (upper-case) to merchant identifier.
    pub entities: BTreeMap<String, String>,

    /// Classification labels excluded from the taxable aggregate.
    pub non_taxable_labels: Vec<String>,

    /// File name marker that exempts a document from the non-taxable skip.
    pub tax_invoice_marker: String,

    /// Profile used by `/upload` without an explicit profile name.
    pub default_profile: String,

    /// Named invoice extractor variants.
    pub profiles: BTreeMap<String, InvoiceProfile>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        let entities = [
            ("SFERA", "1000020410"),
            ("WOMEN SECRET", "1000027886"),
            ("STRADIVARIUS AL MARYAH", "1000058592"),
            ("SPRINGFIELD", "1000239457"),
            ("ZARA HOME", "1000175313"),
            ("LEFTIES", "1000175297"),
        ]
        .into_iter()
        .map(|(name, id)| (name.to_string(), id.to_string()))
        .collect();

        let mut profiles = BTreeMap::new();
        profiles.insert(
            "consignee".to_string(),
            InvoiceProfile {
                recipient: RecipientRule::AllowList {
                    names: vec![
                        "D H TRADING GROUP SPC CO".to_string(),
                        "DUBAI HOLDING GROUP - INDITEX PROJECT".to_string(),
                        "INDITEX S.A.".to_string(),
                    ],
                    expected: None,
                },
                ..InvoiceProfile::default()
            },
        );
        profiles.insert(
            "dh-trading".to_string(),
            InvoiceProfile {
                recipient: RecipientRule::Required {
                    name: "D H TRADING GROUP SPC CO".to_string(),
                },
                ..InvoiceProfile::default()
            },
        );
        profiles.insert("open".to_string(), InvoiceProfile::default());

        Self {
            entities,
            non_taxable_labels: vec![
                "Zero Rated".to_string(),
                "Not Taxable".to_string(),
                "Not Applicable".to_string(),
            ],
            tax_invoice_marker: "TAX INVOICE".to_string(),
            default_profile: "consignee".to_string(),
            profiles,
        }
    }
}

impl ExtractionConfig {
    /// Look up a profile by name, falling back to `default_profile` when `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<&InvoiceProfile, ExtractionError> {
        let name = name.unwrap_or(&self.default_profile);
        self.profiles
            .get(name)
            .ok_or_else(|| ExtractionError::UnknownProfile(name.to_string()))
    }
}

/// One variant of the document-text extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceProfile {
    /// Currency code used in the `TOTAL <currency>` label.
    pub currency: String,

    /// Line marker opening the charge table.
    pub open_marker: String,

    /// Line marker closing the charge table. `None` keeps it open to the end.
    pub close_marker: Option<String>,

    /// Line marker preceding the combined shipper/consignee line.
    pub party_marker: String,

    /// How the recipient is resolved and gated.
    pub recipient: RecipientRule,
}

impl Default for InvoiceProfile {
    fn default() -> Self {
        Self {
            currency: "AED".to_string(),
            open_marker: "CHARGE DESCRIPTION".to_string(),
            close_marker: Some("TOTAL CHARGES".to_string()),
            party_marker: "SHIPPER CONSIGNEE".to_string(),
            recipient: RecipientRule::Disabled,
        }
    }
}

/// Recipient resolution and gating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecipientRule {
    /// No recipient fields are produced.
    #[default]
    Disabled,

    /// The literal must appear verbatim somewhere in the document.
    Required { name: String },

    /// Resolve the consignee positionally against known names.
    AllowList {
        names: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expected: Option<String>,
    },
}

impl FinxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, FinxError> {
        let content = std::fs::read_to_string(path)?;
        let config: FinxConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), FinxError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), FinxError> {
        let extraction = &self.extraction;
        if !extraction.profiles.contains_key(&extraction.default_profile) {
            return Err(FinxError::Config(format!(
                "default profile '{}' is not defined",
                extraction.default_profile
            )));
        }

        for (name, profile) in &extraction.profiles {
            if profile.open_marker.trim().is_empty() {
                return Err(FinxError::Config(format!(
                    "profile '{}' has an empty open marker",
                    name
                )));
            }
            if let RecipientRule::AllowList { names, .. } = &profile.recipient {
                if names.is_empty() {
                    return Err(FinxError::Config(format!(
                        "profile '{}' has an empty recipient allow-list",
                        name
                    )));
                }
            }
        }

        if extraction.entities.keys().any(|k| k != &k.trim().to_uppercase()) {
            return Err(FinxError::Config(
                "entity names must be trimmed upper-case".to_string(),
            ));
        }

        Ok(())
    }
}
