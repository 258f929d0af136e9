//! An in-memory candidate/running datastore implementing [`Session`],
//! mirroring a device's candidate-configuration behavior. Backs tests and the
//! CLI's file-backed reconciliation.

use netconf_xml_core::{diff_with_options, format_text, stage, DiffOptions, KeyConfig, XmlNode};

use crate::session::{Session, SessionError};

/// A candidate/running configuration pair with an exclusive lock flag.
#[derive(Debug, Clone)]
pub struct CandidateSession {
    running: XmlNode,
    candidate: XmlNode,
    keys: KeyConfig,
    locked: bool,
}

impl CandidateSession {
    /// Open a session over a running configuration tree.
    pub fn new(running: XmlNode) -> Self {
        Self {
            candidate: running.clone(),
            running,
            keys: KeyConfig::new(),
            locked: false,
        }
    }

    /// Override the key-field table used for staging and diffing.
    pub fn with_keys(mut self, keys: KeyConfig) -> Self {
        self.keys = keys;
        self
    }

    /// The committed running configuration.
    pub fn running(&self) -> &XmlNode {
        &self.running
    }
}

impl Session for CandidateSession {
    fn lock(&mut self) -> Result<(), SessionError> {
        if self.locked {
            return Err(SessionError::Locked(
                "configuration database locked by another session".to_string(),
            ));
        }
        self.locked = true;
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), SessionError> {
        self.locked = false;
        Ok(())
    }

    fn replace(&mut self, anchor: &str, tree: &XmlNode) -> Result<Option<String>, SessionError> {
        let root_tag = anchor.split('/').next().unwrap_or_default();
        if root_tag.is_empty() {
            return Err(SessionError::Rejected("empty anchor path".to_string()));
        }
        if tree.tag != root_tag {
            return Err(SessionError::Rejected(format!(
                "request tree root <{}> does not match anchor path {}",
                tree.tag, anchor
            )));
        }

        // Stage against a scratch copy so a rejected request leaves the
        // candidate untouched (replace is atomic per call).
        let mut staged = self.candidate.clone();
        stage(&mut staged, tree, &self.keys)
            .map_err(|err| SessionError::Rejected(err.to_string()))?;
        self.candidate = staged;

        let entries = diff_with_options(
            &self.running,
            &self.candidate,
            &DiffOptions {
                keys: self.keys.clone(),
            },
        );
        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(format_text(&entries)))
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        self.running = self.candidate.clone();
        Ok(())
    }

    fn discard(&mut self) -> Result<(), SessionError> {
        self.candidate = self.running.clone();
        Ok(())
    }
}
