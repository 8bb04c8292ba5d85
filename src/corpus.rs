//! Annotated corpus model and JSON loading.

use crate::ast::Attr;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// One corpus position: a token with its annotation layers.
///
/// A layer absent from the source JSON stays `None`; querying an absent
/// layer is an evaluation-time miss, not a load-time error. The empty
/// string is a valid value (unknown morphology is conventionally `""`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    /// Surface form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    /// Dictionary form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    /// Part-of-speech tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    /// Morphological features.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morph: Option<String>,
}

impl AnnotatedToken {
    /// Builds a token with all four layers present.
    pub fn new(
        word: impl Into<String>,
        lemma: impl Into<String>,
        pos: impl Into<String>,
        morph: impl Into<String>,
    ) -> Self {
        Self {
            word: Some(word.into()),
            lemma: Some(lemma.into()),
            pos: Some(pos.into()),
            morph: Some(morph.into()),
        }
    }

    /// Returns the value of the given annotation layer, if present.
    pub fn annotation(&self, attr: Attr) -> Option<&str> {
        match attr {
            Attr::Word => self.word.as_deref(),
            Attr::Lemma => self.lemma.as_deref(),
            Attr::Pos => self.pos.as_deref(),
            Attr::Morph => self.morph.as_deref(),
        }
    }
}

/// Errors from corpus loading.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus file does not exist.
    #[error("corpus file not found: {0}")]
    NotFound(PathBuf),

    /// The corpus file could not be read.
    #[error("failed to read corpus file: {0}")]
    Io(#[from] std::io::Error),

    /// The corpus file is not a JSON array of token objects.
    #[error("invalid JSON in corpus file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads a corpus from a JSON array of token objects.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<AnnotatedToken>, CorpusError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CorpusError::NotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    let corpus: Vec<AnnotatedToken> = serde_json::from_str(&contents)?;

    info!(tokens = corpus.len(), path = %path.display(), "loaded corpus");
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_lookup() {
        let token = AnnotatedToken::new("rey", "rey", "NOUN", "Gender=Masc");
        assert_eq!(token.annotation(Attr::Word), Some("rey"));
        assert_eq!(token.annotation(Attr::Pos), Some("NOUN"));

        let bare = AnnotatedToken::default();
        assert_eq!(bare.annotation(Attr::Lemma), None);
    }

    #[test]
    fn deserialize_full_token() {
        let token: AnnotatedToken =
            serde_json::from_str(r#"{"word":"al","lemma":"al","pos":"ADP","morph":""}"#).unwrap();
        assert_eq!(token.word.as_deref(), Some("al"));
        // Empty string is a value, not an absence
        assert_eq!(token.annotation(Attr::Morph), Some(""));
    }

    #[test]
    fn deserialize_missing_key_as_absent() {
        let token: AnnotatedToken = serde_json::from_str(r#"{"word":"al","pos":"ADP"}"#).unwrap();
        assert_eq!(token.lemma, None);
        assert_eq!(token.annotation(Attr::Morph), None);
    }

    #[test]
    fn serialize_skips_absent_layers() {
        let token = AnnotatedToken {
            word: Some("al".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&token).unwrap(), r#"{"word":"al"}"#);
    }

    #[test]
    fn load_corpus_rejects_missing_file() {
        let err = load_corpus("/nonexistent/corpus.json").unwrap_err();
        assert!(matches!(err, CorpusError::NotFound(_)));
    }
}
