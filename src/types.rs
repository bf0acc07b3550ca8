// src/types.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Page prefix for a single certificate on crt.sh
pub const DEFAULT_LINK_BASE: &str = "https://crt.sh/?id=";

/// One row of a crt.sh JSON search result.
///
/// crt.sh sends `null` for some fields (`common_name`, `entry_timestamp`);
/// null and absent fields decode to empty/zero so the row is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub issuer_ca_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub issuer_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub common_name: String,

    /// SAN value(s), newline separated when the cert carries several
    #[serde(deserialize_with = "null_as_default")]
    pub name_value: String,

    /// crt.sh certificate id
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,

    #[serde(deserialize_with = "null_as_default")]
    pub entry_timestamp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub not_before: String,
    #[serde(deserialize_with = "null_as_default")]
    pub not_after: String,
    #[serde(deserialize_with = "null_as_default")]
    pub serial_number: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CertificateRecord {
    /// Key shared by a leaf certificate and its precertificate
    pub fn dedupe_key(&self) -> String {
        format!("{}{}", self.name_value, self.not_before)
    }

    /// Link to this certificate's crt.sh page
    pub fn link(&self, link_base: &str) -> String {
        format!("{}{}", link_base, self.id)
    }
}

impl fmt::Display for CertificateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.common_name)
    }
}

/// A record as rendered for output, with its crt.sh link
#[derive(Debug, Serialize)]
pub struct EnrichedCertificateRecord<'a> {
    pub crt_sh_link: String,
    #[serde(flatten)]
    pub record: &'a CertificateRecord,
}

impl<'a> EnrichedCertificateRecord<'a> {
    pub fn new(record: &'a CertificateRecord, link_base: &str) -> Self {
        Self {
            crt_sh_link: record.link(link_base),
            record,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_record(id: i64, name_value: &str, not_before: &str) -> CertificateRecord {
    CertificateRecord {
        issuer_ca_id: 16418,
        issuer_name: "C=US, O=Let's Encrypt, CN=R3".to_string(),
        common_name: name_value.lines().next().unwrap_or_default().to_string(),
        name_value: name_value.to_string(),
        id,
        entry_timestamp: "2021-06-15T10:12:33.456".to_string(),
        not_before: not_before.to_string(),
        not_after: "2021-09-13T00:00:00".to_string(),
        serial_number: format!("04{:x}", id),
    }
}
