//! Data shapes exchanged with the API.
//!
//! [`Payload`] is a closed set of variants. The payload handed to the engine
//! is both the outbound body (for non-GET methods) and the shape expected back
//! on success. [`Payload::None`] means "no body, no expectation"; it is
//! distinct from a typed empty value such as `Payload::RepositoryList(vec![])`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::connection::Vendor;

/// Human-readable rendering of an API value.
pub trait Render {
    fn render(&self) -> String;
}

/// Repository name and privacy, as returned by list/get and accepted by create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub name: String,
    #[serde(default)]
    pub private: bool,
}

impl Render for RepositoryDescriptor {
    fn render(&self) -> String {
        format!("{} (private:{})", self.name, self.private)
    }
}

impl Render for Vec<RepositoryDescriptor> {
    fn render(&self) -> String {
        self.iter()
            .map(Render::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Repository topics.
///
/// GitHub reads and writes `names`; Gitea returns `topics` on GET and accepts
/// `topics` on PUT. Only the populated field is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopicList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
}

impl TopicList {
    /// Topic list shaped for the given vendor's PUT body.
    pub fn for_vendor(vendor: Vendor, topics: Vec<String>) -> Self {
        match vendor {
            Vendor::Github => Self {
                topics: None,
                names: Some(topics),
            },
            Vendor::Gitea => Self {
                topics: Some(topics),
                names: None,
            },
        }
    }

    /// All topics regardless of which field carried them.
    pub fn all(&self) -> Vec<&str> {
        self.names
            .iter()
            .chain(self.topics.iter())
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

impl Render for TopicList {
    fn render(&self) -> String {
        self.all().join("\n")
    }
}

/// Repository public key used to seal Actions secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub key_id: String,
    /// Base64-encoded Curve25519 public key.
    pub key: String,
}

impl Render for PublicKey {
    fn render(&self) -> String {
        format!("Key: {}\nKey ID: {}", self.key, self.key_id)
    }
}

/// Body of a create/update secret request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecretPair {
    /// Base64-encoded sealed box.
    pub encrypted_value: String,
    pub key_id: String,
}

impl Render for EncryptedSecretPair {
    fn render(&self) -> String {
        format!("Value: {}\nKey ID: {}", self.encrypted_value, self.key_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateFlag {
    pub private: bool,
}

impl Render for PrivateFlag {
    fn render(&self) -> String {
        self.private.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityFlag {
    pub visibility: String,
}

impl Render for VisibilityFlag {
    fn render(&self) -> String {
        self.visibility.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionFlag {
    // GitHub sends `null` for repositories without a description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl Render for DescriptionFlag {
    fn render(&self) -> String {
        self.description.clone()
    }
}

/// GitHub Actions permissions of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsPermissions {
    pub enabled: bool,
    /// `all`, `local_only` or `selected`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_actions: Option<String>,
}

impl Render for ActionsPermissions {
    fn render(&self) -> String {
        match &self.allowed_actions {
            Some(allowed) => format!("enabled:{} allowed_actions:{}", self.enabled, allowed),
            None => format!("enabled:{}", self.enabled),
        }
    }
}

/// Metadata of one Actions secret. Values are never returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretInfo {
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Render for SecretInfo {
    fn render(&self) -> String {
        match self.updated_at.as_deref().and_then(format_timestamp) {
            Some(updated) => format!("{} (updated {})", self.name, updated),
            None => self.name.clone(),
        }
    }
}

/// Secrets of a repository.
///
/// GitHub wraps the list as `{total_count, secrets}`; Gitea returns a bare
/// array. Both decode into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretList {
    pub total_count: u64,
    pub secrets: Vec<SecretInfo>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SecretListBody {
    Bare(Vec<SecretInfo>),
    Wrapped {
        #[serde(default)]
        total_count: Option<u64>,
        #[serde(default, deserialize_with = "null_as_default")]
        secrets: Vec<SecretInfo>,
    },
}

impl<'de> Deserialize<'de> for SecretList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (total_count, secrets) = match SecretListBody::deserialize(deserializer)? {
            SecretListBody::Bare(secrets) => (None, secrets),
            SecretListBody::Wrapped {
                total_count,
                secrets,
            } => (total_count, secrets),
        };
        Ok(Self {
            total_count: total_count.unwrap_or(secrets.len() as u64),
            secrets,
        })
    }
}

impl Render for SecretList {
    fn render(&self) -> String {
        self.secrets
            .iter()
            .map(Render::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Error object returned by the API on non-2xx responses.
///
/// GitHub sends `message`, `documentation_url` and sometimes `status` and an
/// `errors` array of objects; Gitea sends `message` and an `errors` array of
/// strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    // Gitea sends `"errors": null` on plain not-found responses.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub errors: Vec<serde_json::Value>,
}

impl VendorError {
    /// Detail lines from the `errors` array.
    pub fn details(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|err| match err {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Object(map) => match map.get("message") {
                    Some(serde_json::Value::String(msg)) => msg.clone(),
                    _ => err.to_string(),
                },
                other => other.to_string(),
            })
            .collect()
    }
}

impl Render for VendorError {
    fn render(&self) -> String {
        let mut lines = vec![self.message.clone()];
        lines.extend(self.details().into_iter().map(|d| format!("- {}", d)));
        lines.join("\n")
    }
}

/// Every data shape the client sends or expects.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// No request body and no expected response body.
    #[default]
    None,
    Repository(RepositoryDescriptor),
    RepositoryList(Vec<RepositoryDescriptor>),
    Topics(TopicList),
    PublicKey(PublicKey),
    EncryptedSecret(EncryptedSecretPair),
    Private(PrivateFlag),
    Visibility(VisibilityFlag),
    Description(DescriptionFlag),
    ActionsPermissions(ActionsPermissions),
    SecretList(SecretList),
    VendorError(VendorError),
}

/// Discriminant of [`Payload`], used to name the expected response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    None,
    Repository,
    RepositoryList,
    Topics,
    PublicKey,
    EncryptedSecret,
    Private,
    Visibility,
    Description,
    ActionsPermissions,
    SecretList,
    VendorError,
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::None => PayloadKind::None,
            Payload::Repository(_) => PayloadKind::Repository,
            Payload::RepositoryList(_) => PayloadKind::RepositoryList,
            Payload::Topics(_) => PayloadKind::Topics,
            Payload::PublicKey(_) => PayloadKind::PublicKey,
            Payload::EncryptedSecret(_) => PayloadKind::EncryptedSecret,
            Payload::Private(_) => PayloadKind::Private,
            Payload::Visibility(_) => PayloadKind::Visibility,
            Payload::Description(_) => PayloadKind::Description,
            Payload::ActionsPermissions(_) => PayloadKind::ActionsPermissions,
            Payload::SecretList(_) => PayloadKind::SecretList,
            Payload::VendorError(_) => PayloadKind::VendorError,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }

    /// JSON request body, or `None` for [`Payload::None`].
    pub fn to_body(&self) -> serde_json::Result<Option<Vec<u8>>> {
        let body = match self {
            Payload::None => return Ok(None),
            Payload::Repository(v) => serde_json::to_vec(v)?,
            Payload::RepositoryList(v) => serde_json::to_vec(v)?,
            Payload::Topics(v) => serde_json::to_vec(v)?,
            Payload::PublicKey(v) => serde_json::to_vec(v)?,
            Payload::EncryptedSecret(v) => serde_json::to_vec(v)?,
            Payload::Private(v) => serde_json::to_vec(v)?,
            Payload::Visibility(v) => serde_json::to_vec(v)?,
            Payload::Description(v) => serde_json::to_vec(v)?,
            Payload::ActionsPermissions(v) => serde_json::to_vec(v)?,
            Payload::SecretList(v) => serde_json::to_vec(v)?,
            Payload::VendorError(v) => serde_json::to_vec(v)?,
        };
        Ok(Some(body))
    }
}

impl PayloadKind {
    /// Decode a response body into this shape.
    ///
    /// [`PayloadKind::None`] never looks at the body.
    pub fn decode(self, body: &[u8]) -> serde_json::Result<Payload> {
        let payload = match self {
            PayloadKind::None => Payload::None,
            PayloadKind::Repository => Payload::Repository(serde_json::from_slice(body)?),
            PayloadKind::RepositoryList => Payload::RepositoryList(serde_json::from_slice(body)?),
            PayloadKind::Topics => Payload::Topics(serde_json::from_slice(body)?),
            PayloadKind::PublicKey => Payload::PublicKey(serde_json::from_slice(body)?),
            PayloadKind::EncryptedSecret => {
                Payload::EncryptedSecret(serde_json::from_slice(body)?)
            }
            PayloadKind::Private => Payload::Private(serde_json::from_slice(body)?),
            PayloadKind::Visibility => Payload::Visibility(serde_json::from_slice(body)?),
            PayloadKind::Description => Payload::Description(serde_json::from_slice(body)?),
            PayloadKind::ActionsPermissions => {
                Payload::ActionsPermissions(serde_json::from_slice(body)?)
            }
            PayloadKind::SecretList => Payload::SecretList(serde_json::from_slice(body)?),
            PayloadKind::VendorError => Payload::VendorError(serde_json::from_slice(body)?),
        };
        Ok(payload)
    }
}

impl Render for Payload {
    fn render(&self) -> String {
        match self {
            Payload::None => String::new(),
            Payload::Repository(v) => v.render(),
            Payload::RepositoryList(v) => v.render(),
            Payload::Topics(v) => v.render(),
            Payload::PublicKey(v) => v.render(),
            Payload::EncryptedSecret(v) => v.render(),
            Payload::Private(v) => v.render(),
            Payload::Visibility(v) => v.render(),
            Payload::Description(v) => v.render(),
            Payload::ActionsPermissions(v) => v.render(),
            Payload::SecretList(v) => v.render(),
            Payload::VendorError(v) => v.render(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn format_timestamp(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_descriptor_round_trip() {
        let original = Payload::Repository(RepositoryDescriptor {
            name: "x".to_string(),
            private: true,
        });
        let body = original.to_body().unwrap().unwrap();
        let decoded = PayloadKind::Repository.decode(&body).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_none_has_no_body() {
        assert_eq!(Payload::None.to_body().unwrap(), None);
        assert_eq!(PayloadKind::None.decode(b"not json").unwrap(), Payload::None);
    }

    #[test]
    fn test_empty_list_is_not_none() {
        let empty = Payload::RepositoryList(Vec::new());
        assert!(!empty.is_none());
        assert_eq!(empty.kind(), PayloadKind::RepositoryList);
        assert_eq!(empty.to_body().unwrap(), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_repository_list_ignores_unknown_fields() {
        let body = br#"[{"id":1,"name":"a","private":false,"fork":true},{"id":2,"name":"b","private":true}]"#;
        let decoded = PayloadKind::RepositoryList.decode(body).unwrap();
        assert_eq!(decoded.render(), "a (private:false)\nb (private:true)");
    }

    #[test]
    fn test_topics_for_vendor() {
        let gh = TopicList::for_vendor(Vendor::Github, vec!["rust".to_string()]);
        assert_eq!(serde_json::to_string(&gh).unwrap(), r#"{"names":["rust"]}"#);

        let gitea = TopicList::for_vendor(Vendor::Gitea, vec!["rust".to_string()]);
        assert_eq!(
            serde_json::to_string(&gitea).unwrap(),
            r#"{"topics":["rust"]}"#
        );
    }

    #[test]
    fn test_topics_render_either_field() {
        let gh: TopicList = serde_json::from_str(r#"{"names":["cli","rust"]}"#).unwrap();
        assert_eq!(gh.render(), "cli\nrust");
        let gitea: TopicList = serde_json::from_str(r#"{"topics":["api"]}"#).unwrap();
        assert_eq!(gitea.render(), "api");
    }

    #[test]
    fn test_description_null_is_empty() {
        let desc: DescriptionFlag = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(desc.description, "");
        let desc: DescriptionFlag = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(desc.description, "");
    }

    #[test]
    fn test_flags_decode_from_full_repository() {
        let body = br#"{"name":"x","private":true,"visibility":"private","description":"demo"}"#;
        assert_eq!(PayloadKind::Private.decode(body).unwrap().render(), "true");
        assert_eq!(
            PayloadKind::Visibility.decode(body).unwrap().render(),
            "private"
        );
        assert_eq!(PayloadKind::Description.decode(body).unwrap().render(), "demo");
    }

    #[test]
    fn test_vendor_error_github_shape() {
        let body = br#"{"message":"Validation Failed","errors":[{"resource":"Repository","code":"custom","message":"name already exists on this account"}],"documentation_url":"https://docs.github.com","status":"422"}"#;
        let err = match PayloadKind::VendorError.decode(body).unwrap() {
            Payload::VendorError(err) => err,
            other => panic!("unexpected payload: {other:?}"),
        };
        assert_eq!(err.message, "Validation Failed");
        assert_eq!(
            err.render(),
            "Validation Failed\n- name already exists on this account"
        );
    }

    #[test]
    fn test_vendor_error_gitea_shape() {
        let body = br#"{"message":"repository already exists","errors":["name: exists"],"url":"https://gitea.example.com/api/swagger"}"#;
        let decoded = PayloadKind::VendorError.decode(body).unwrap();
        assert_eq!(decoded.render(), "repository already exists\n- name: exists");
    }

    #[test]
    fn test_vendor_error_gitea_null_errors() {
        let body = br#"{"errors":null,"message":"The target couldn't be found.","url":"https://gitea.example.com/api/swagger"}"#;
        let err = match PayloadKind::VendorError.decode(body).unwrap() {
            Payload::VendorError(err) => err,
            other => panic!("unexpected payload: {other:?}"),
        };
        assert!(err.errors.is_empty());
        assert_eq!(err.render(), "The target couldn't be found.");
    }

    #[test]
    fn test_secret_list_gitea_bare_array() {
        let body = br#"[{"name":"API_KEY","created_at":"2024-01-02T03:04:05Z"},{"name":"OTHER"}]"#;
        let decoded = PayloadKind::SecretList.decode(body).unwrap();
        let Payload::SecretList(list) = &decoded else {
            panic!("unexpected payload: {decoded:?}");
        };
        assert_eq!(list.total_count, 2);
        assert_eq!(decoded.render(), "API_KEY\nOTHER");
    }

    #[test]
    fn test_secret_list_render() {
        let body = br#"{"total_count":2,"secrets":[{"name":"API_TOKEN","created_at":"2024-01-10T10:00:00Z","updated_at":"2024-02-01T08:30:00Z"},{"name":"OTHER"}]}"#;
        let decoded = PayloadKind::SecretList.decode(body).unwrap();
        assert_eq!(
            decoded.render(),
            "API_TOKEN (updated 2024-02-01 08:30 UTC)\nOTHER"
        );
    }

    #[test]
    fn test_actions_permissions_render() {
        let perms = ActionsPermissions {
            enabled: true,
            allowed_actions: Some("all".to_string()),
        };
        assert_eq!(perms.render(), "enabled:true allowed_actions:all");
        let perms = ActionsPermissions {
            enabled: false,
            allowed_actions: None,
        };
        assert_eq!(
            serde_json::to_string(&perms).unwrap(),
            r#"{"enabled":false}"#
        );
    }
}
