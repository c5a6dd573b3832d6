use crate::extraction_engine::{ExtractionEngine, TextExtractor};
use crate::naming::CanonicalName;
use crate::patterns::{extract_identifier, extract_identity};
use crate::planner::{RenamePlan, RenamePlanner};
use crate::scanner::scan_directory;
use crate::{Document, RenameError, RenamerConfig, Result};
use std::fmt;
use std::fs;
use tracing::{debug, info, warn};

// ── Batch result types ───────────────────────────────────────────────────────

/// Why a document could not be given a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The filename has no run of exactly 13 digits.
    NoIdentifier,
    /// Neither embedded text nor OCR produced any text.
    NoText,
    /// Text was found but no `title first last` sequence in it.
    NoIdentityMatch,
    /// The prefixed entry is a directory or a link to nothing.
    NotAFile,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnresolvedReason::NoIdentifier => "no 13-digit identifier in filename",
            UnresolvedReason::NoText => "no text extracted",
            UnresolvedReason::NoIdentityMatch => "no Thai name found in text",
            UnresolvedReason::NotAFile => "not a regular file",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub file_name: String,
    pub reason: UnresolvedReason,
}

/// What one pass over the directory decided, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPlan {
    pub renames: Vec<RenamePlan>,
    /// Documents already carrying their resolved name.
    pub unchanged: Vec<String>,
    pub unresolved: Vec<Unresolved>,
}

/// Result of attempting one planned rename.
#[derive(Debug)]
pub struct MoveOutcome {
    pub plan: RenamePlan,
    pub result: Result<()>,
}

impl MoveOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

enum Verdict {
    Planned(RenamePlan),
    Unchanged,
    Unresolved(UnresolvedReason),
}

// ── BatchRenamer ─────────────────────────────────────────────────────────────

/// Entry point for planning and applying the renames of one directory.
///
/// # Creating a renamer
///
/// ```no_run
/// use idcard_rename::{BatchRenamer, RenamerConfig};
///
/// // Default pipeline: embedded PDF text, then rasterization + OCR
/// let renamer = BatchRenamer::new(RenamerConfig::new("./scans"));
///
/// let plan = renamer.plan().unwrap();
/// let outcomes = renamer.apply(&plan, |outcome| {
///     println!("{} -> {}: {}", outcome.plan.source, outcome.plan.target, outcome.is_success());
/// });
/// ```
pub struct BatchRenamer {
    config: RenamerConfig,
    extractor: Box<dyn TextExtractor>,
}

impl BatchRenamer {
    /// Renamer using the extraction pipeline described by `config.ocr`.
    pub fn new(config: RenamerConfig) -> Self {
        let extractor = Box::new(ExtractionEngine::from_config(&config.ocr));
        Self { config, extractor }
    }

    /// Renamer reading document text through a caller-supplied extractor.
    pub fn with_extractor(config: RenamerConfig, extractor: Box<dyn TextExtractor>) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &RenamerConfig {
        &self.config
    }

    // ── Planning ──────────────────────────────────────────────────────────────

    /// Read the directory and decide a target name for every document.
    ///
    /// Nothing on disk changes. Returns [`RenameError::DirectoryRead`] when the
    /// directory cannot be listed; every per-document problem ends up in
    /// [`BatchPlan::unresolved`] instead. Prefixed entries that are not files
    /// follow the documents there.
    pub fn plan(&self) -> Result<BatchPlan> {
        let listing = scan_directory(&self.config.directory, &self.config.prefix)?;
        let mut planner = RenamePlanner::in_directory(&self.config.directory, listing.entries.iter().cloned());
        let mut batch = BatchPlan::default();

        for document in &listing.documents {
            match self.classify(document, &mut planner) {
                Verdict::Planned(plan) => {
                    info!("planned '{}' -> '{}'", plan.source, plan.target);
                    batch.renames.push(plan);
                }
                Verdict::Unchanged => {
                    debug!("'{}' already has its canonical name", document.file_name);
                    batch.unchanged.push(document.file_name.clone());
                }
                Verdict::Unresolved(reason) => {
                    info!("unresolved '{}': {}", document.file_name, reason);
                    batch.unresolved.push(Unresolved {
                        file_name: document.file_name.clone(),
                        reason,
                    });
                }
            }
        }

        for name in listing.skipped {
            warn!("unresolved '{}': {}", name, UnresolvedReason::NotAFile);
            batch.unresolved.push(Unresolved {
                file_name: name,
                reason: UnresolvedReason::NotAFile,
            });
        }

        Ok(batch)
    }

    fn classify(&self, document: &Document, planner: &mut RenamePlanner) -> Verdict {
        let Some(identifier) = extract_identifier(&document.file_name) else {
            return Verdict::Unresolved(UnresolvedReason::NoIdentifier);
        };

        let text = self.extractor.extract(document).unwrap_or_else(|e| {
            warn!("'{}': text extraction failed: {}", document.file_name, e);
            String::new()
        });
        if text.trim().is_empty() {
            return Verdict::Unresolved(UnresolvedReason::NoText);
        }

        let Some(identity) = extract_identity(&text) else {
            return Verdict::Unresolved(UnresolvedReason::NoIdentityMatch);
        };

        match planner.plan(document, &identifier, &identity) {
            Some(plan) => Verdict::Planned(plan),
            None => Verdict::Unchanged,
        }
    }

    // ── Applying ──────────────────────────────────────────────────────────────

    /// Perform every planned rename in order.
    ///
    /// `on_outcome` is called right after each attempt. A failed rename is
    /// recorded and the batch moves on; nothing is rolled back.
    pub fn apply<F>(&self, plan: &BatchPlan, mut on_outcome: F) -> Vec<MoveOutcome>
    where
        F: FnMut(&MoveOutcome),
    {
        let mut outcomes = Vec::with_capacity(plan.renames.len());

        for rename in &plan.renames {
            let outcome = MoveOutcome {
                plan: rename.clone(),
                result: self.move_file(rename),
            };
            match &outcome.result {
                Ok(()) => info!("renamed '{}' -> '{}'", rename.source, rename.target),
                Err(e) => warn!("rename of '{}' failed: {}", rename.source, e),
            }
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Rename within the batch directory, refusing to replace an existing file.
    fn move_file(&self, plan: &RenamePlan) -> Result<()> {
        let from = self.config.directory.join(&plan.source);
        let to = self.config.directory.join(&plan.target);

        // symlink_metadata also sees dangling links, which rename would replace.
        if fs::symlink_metadata(&to).is_ok() {
            return Err(RenameError::TargetExists(plan.target.clone()));
        }

        fs::rename(&from, &to).map_err(|source| RenameError::MoveFailed {
            from: plan.source.clone(),
            to: plan.target.clone(),
            source,
        })
    }

    // ── Naming-convention check ───────────────────────────────────────────────

    /// Names of the regular files in the directory that do not follow the
    /// `{title}_{first}_{last}_{id}` convention, sorted.
    pub fn verify(&self) -> Result<Vec<String>> {
        let listing = scan_directory(&self.config.directory, "")?;
        Ok(listing
            .documents
            .into_iter()
            .map(|doc| doc.file_name)
            .filter(|name| CanonicalName::parse(name).is_none())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_have_distinct_messages() {
        let reasons = [
            UnresolvedReason::NoIdentifier,
            UnresolvedReason::NoText,
            UnresolvedReason::NoIdentityMatch,
            UnresolvedReason::NotAFile,
        ];
        let messages: std::collections::HashSet<_> = reasons.iter().map(|r| r.to_string()).collect();
        assert_eq!(messages.len(), reasons.len());
    }

    #[test]
    fn move_outcome_success_flag() {
        let plan = RenamePlan {
            source: "a".into(),
            target: "b".into(),
        };
        let ok = MoveOutcome {
            plan: plan.clone(),
            result: Ok(()),
        };
        let failed = MoveOutcome {
            plan,
            result: Err(RenameError::TargetExists("b".into())),
        };
        assert!(ok.is_success());
        assert!(!failed.is_success());
    }
}
