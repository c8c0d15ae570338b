//! Output file naming with `[token]` substitution.
//!
//! Supported tokens:
//!
//! - `[name]` file name without its extension, `file` when empty.
//! - `[ext]` extension without the dot, `bin` when the file has none.
//! - `[path]` directory of the file relative to the context directory, with a trailing `/`.
//! - `[folder]` last component of that directory.
//! - `[hash]`, `[contenthash]` and the long form `[<hashType>:hash:<digest>:<length>]`, where
//!   every part but `hash` is optional (`[hash:8]`, `[sha256:contenthash:base64:12]`).
//!
//! Unknown tokens are left in place.

use std::path::{Component, Path};
use std::sync::OnceLock;

use base64::{Engine as _, engine::general_purpose};
use regex::{Captures, NoExpand, Regex};
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;
use xxhash_rust::xxh64::xxh64;

use crate::error::ConfigError;

/// Extension token every output template must end with.
pub const EXT_TOKEN: &str = "[ext]";
/// Host output template assumed when the host does not configure one.
pub const DEFAULT_HOST_TEMPLATE: &str = "[name].js";

/// Failure while expanding a naming template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
  /// The template asks for a hash function that is not available.
  #[error("unsupported hash type \"{0}\"")]
  UnsupportedHash(String),
  /// The template asks for a digest encoding that is not available.
  #[error("unsupported digest type \"{0}\"")]
  UnsupportedDigest(String),
}

fn hash_token() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"(?i)\[(?:([^:\]]+):)?(?:hash|contenthash)(?::([a-z]+\d*))?(?::(\d+))?\]")
      .expect("invalid hash token regex")
  })
}

fn simple_token(name: &str) -> Regex {
  Regex::new(&format!(r"(?i)\[{}\]", regex::escape(name))).expect("invalid token regex")
}

fn simple_tokens() -> &'static [(Regex, Token)] {
  static TOKENS: OnceLock<Vec<(Regex, Token)>> = OnceLock::new();
  TOKENS
    .get_or_init(|| {
      vec![
        (simple_token("ext"), Token::Ext),
        (simple_token("name"), Token::Name),
        (simple_token("path"), Token::Path),
        (simple_token("folder"), Token::Folder),
      ]
    })
    .as_slice()
}

#[derive(Debug, Clone, Copy)]
enum Token {
  Ext,
  Name,
  Path,
  Folder,
}

/// Expand `template` for the file at `resource_path` with the given `content`.
///
/// `[path]` and `[folder]` are computed relative to `context` when the resource lives below
/// it, and from the resource's own directory otherwise.
pub fn interpolate_name(
  resource_path: &Path,
  context: Option<&Path>,
  template: &str,
  content: &[u8],
) -> Result<String, NamingError> {
  let ext = resource_path
    .extension()
    .map(|value| value.to_string_lossy().into_owned())
    .unwrap_or_else(|| "bin".to_string());
  let name = resource_path
    .file_stem()
    .map(|value| value.to_string_lossy().into_owned())
    .filter(|value| !value.is_empty())
    .unwrap_or_else(|| "file".to_string());
  let directory = relative_directory(resource_path, context);
  let folder = directory
    .trim_end_matches('/')
    .rsplit('/')
    .next()
    .unwrap_or_default()
    .to_string();

  let mut failure = None;
  let hashed = hash_token().replace_all(template, |caps: &Captures| {
    match render_hash(caps, content) {
      Ok(value) => value,
      Err(err) => {
        if failure.is_none() {
          failure = Some(err);
        }
        String::new()
      }
    }
  });
  if let Some(err) = failure {
    return Err(err);
  }

  let mut output = hashed.into_owned();
  for (pattern, token) in simple_tokens() {
    let value = match token {
      Token::Ext => ext.as_str(),
      Token::Name => name.as_str(),
      Token::Path => directory.as_str(),
      Token::Folder => folder.as_str(),
    };
    output = pattern.replace_all(&output, NoExpand(value)).into_owned();
  }

  Ok(output)
}

fn render_hash(caps: &Captures, content: &[u8]) -> Result<String, NamingError> {
  let hash_type = caps.get(1).map_or("xxhash64", |m| m.as_str());
  let digest_type = caps.get(2).map_or("hex", |m| m.as_str());
  let length = caps
    .get(3)
    .and_then(|m| m.as_str().parse::<usize>().ok());

  let raw: Vec<u8> = match hash_type.to_ascii_lowercase().as_str() {
    "xxhash64" => xxh64(content, 0).to_be_bytes().to_vec(),
    "sha256" => Sha256::digest(content).to_vec(),
    "sha512" => Sha512::digest(content).to_vec(),
    other => return Err(NamingError::UnsupportedHash(other.to_string())),
  };

  let mut digest = match digest_type.to_ascii_lowercase().as_str() {
    "hex" => hex::encode(&raw),
    "base64" => general_purpose::URL_SAFE_NO_PAD.encode(&raw),
    other => return Err(NamingError::UnsupportedDigest(other.to_string())),
  };

  if let Some(length) = length {
    digest.truncate(length);
  }
  Ok(digest)
}

fn relative_directory(resource_path: &Path, context: Option<&Path>) -> String {
  let Some(parent) = resource_path.parent() else {
    return String::new();
  };
  let relative = context
    .and_then(|base| parent.strip_prefix(base).ok())
    .unwrap_or(parent);

  let segments: Vec<String> = relative
    .components()
    .filter_map(|component| match component {
      Component::Normal(value) => Some(value.to_string_lossy().into_owned()),
      Component::ParentDir => Some("_".to_string()),
      _ => None,
    })
    .collect();

  if segments.is_empty() {
    String::new()
  } else {
    format!("{}/", segments.join("/"))
  }
}

/// Turn the host's primary output template into one usable for arbitrary assets.
///
/// A trailing `.<ext>` is dropped and `.[ext]` appended unless the template already carries one.
pub fn derive_output_template(host_template: &str) -> String {
  static EXTENSION: OnceLock<Regex> = OnceLock::new();
  let extension =
    EXTENSION.get_or_init(|| Regex::new(r"(?i)\.[a-z]+$").expect("invalid extension regex"));

  let without_extension = extension.replace(host_template, "");
  if without_extension.to_ascii_lowercase().contains(".[ext]") {
    without_extension.into_owned()
  } else {
    format!("{without_extension}.{EXT_TOKEN}")
  }
}

/// Reject an explicit output template that cannot carry the asset's extension.
pub fn validate_output_template(template: &str) -> Result<(), ConfigError> {
  if template.ends_with(EXT_TOKEN) {
    Ok(())
  } else {
    Err(ConfigError::InvalidFilename {
      template: template.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  #[test]
  fn substitutes_name_and_extension() {
    let name = interpolate_name(Path::new("/assets/logo.png"), None, "[name].[ext]", b"").unwrap();
    assert_eq!(name, "logo.png");
  }

  #[test]
  fn falls_back_for_missing_extension() {
    let name = interpolate_name(Path::new("/assets/LICENSE"), None, "[name].[ext]", b"").unwrap();
    assert_eq!(name, "LICENSE.bin");
  }

  #[test]
  fn truncated_hash_is_hex_of_requested_length() {
    let name =
      interpolate_name(Path::new("/assets/logo.png"), None, "[name].[hash:8].[ext]", b"pixels")
        .unwrap();
    let hash = name
      .strip_prefix("logo.")
      .and_then(|rest| rest.strip_suffix(".png"))
      .unwrap();
    assert_eq!(hash.len(), 8);
    assert!(hash.chars().all(|ch| ch.is_ascii_hexdigit()));
  }

  #[test]
  fn default_hash_is_full_xxhash64() {
    let name = interpolate_name(Path::new("a.txt"), None, "[contenthash]", b"content").unwrap();
    assert_eq!(name, format!("{:016x}", xxh64(b"content", 0)));
  }

  #[test]
  fn hash_depends_on_content() {
    let first = interpolate_name(Path::new("a.txt"), None, "[hash]", b"one").unwrap();
    let second = interpolate_name(Path::new("a.txt"), None, "[hash]", b"two").unwrap();
    assert_ne!(first, second);
  }

  #[test]
  fn supports_long_hash_form() {
    let name =
      interpolate_name(Path::new("a.txt"), None, "[sha256:hash:hex:12]", b"content").unwrap();
    let expected = hex::encode(Sha256::digest(b"content"));
    assert_eq!(name, expected[..12]);

    let encoded =
      interpolate_name(Path::new("a.txt"), None, "[sha512:contenthash:base64:10]", b"x").unwrap();
    assert_eq!(encoded.len(), 10);
  }

  #[test]
  fn rejects_unknown_hash_types() {
    let result = interpolate_name(Path::new("a.txt"), None, "[md4:hash:hex:8]", b"");
    assert_eq!(result, Err(NamingError::UnsupportedHash("md4".into())));
  }

  #[test]
  fn path_and_folder_are_relative_to_context() {
    let context = PathBuf::from("/assets");
    let name = interpolate_name(
      Path::new("/assets/img/icons/star.svg"),
      Some(&context),
      "[path]|[folder]|[name]",
      b"",
    )
    .unwrap();
    assert_eq!(name, "img/icons/|icons|star");

    let root = interpolate_name(Path::new("/assets/star.svg"), Some(&context), "[path][name]", b"")
      .unwrap();
    assert_eq!(root, "star");
  }

  #[test]
  fn leaves_unknown_tokens_untouched() {
    let name = interpolate_name(Path::new("a.txt"), None, "[id]-[name].[ext]", b"").unwrap();
    assert_eq!(name, "[id]-a.txt");
  }

  #[test]
  fn derives_template_from_host_output() {
    assert_eq!(derive_output_template("[name].js"), "[name].[ext]");
    assert_eq!(
      derive_output_template("[name].[contenthash:8].js"),
      "[name].[contenthash:8].[ext]"
    );
    assert_eq!(derive_output_template("[name].[ext]"), "[name].[ext]");
    assert_eq!(derive_output_template("bundle"), "bundle.[ext]");
  }

  #[test]
  fn validates_explicit_templates() {
    assert!(validate_output_template("[name].[hash:8].[ext]").is_ok());
    assert!(matches!(
      validate_output_template("[name].[hash:8].png"),
      Err(ConfigError::InvalidFilename { .. })
    ));
  }
}
