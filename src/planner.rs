use crate::naming::{canonical_base, compose_file_name};
use crate::{Document, Identity};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A rename the batch intends to perform inside its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub source: String,
    pub target: String,
}

/// Chooses collision-free target names for the documents of one batch.
///
/// The planner starts from every name present in the directory and reserves
/// each target as soon as it is assigned, so two documents of the same batch
/// never receive the same name even before anything is renamed. Source names
/// stay reserved: a file is not moved onto a name another pending file still
/// occupies.
///
/// A planner bound to a directory also asks the filesystem about each
/// candidate, so names the listing does not show verbatim (a case-insensitive
/// volume, a file created after the scan) still count as taken.
#[derive(Debug, Clone, Default)]
pub struct RenamePlanner {
    reserved: HashSet<String>,
    directory: Option<PathBuf>,
}

impl RenamePlanner {
    pub fn new<I, S>(existing_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reserved: existing_names.into_iter().map(Into::into).collect(),
            directory: None,
        }
    }

    /// Planner that also checks candidates against `directory` on disk.
    pub fn in_directory<P, I, S>(directory: P, existing_names: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            directory: Some(directory.as_ref().to_path_buf()),
            ..Self::new(existing_names)
        }
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    fn is_taken(&self, name: &str) -> bool {
        self.is_reserved(name)
            || self
                .directory
                .as_ref()
                .is_some_and(|dir| fs::symlink_metadata(dir.join(name)).is_ok())
    }

    /// Resolve the first free name for `base` + `extension`.
    ///
    /// Probes `base.ext`, `base_1.ext`, `base_2.ext`, … and stops at the first
    /// candidate that is not taken or that is `source` itself. Terminates
    /// because the reserved set is finite.
    pub fn resolve_target(&self, base: &str, extension: &str, source: &str) -> String {
        let mut candidate = compose_file_name(base, None, extension);
        let mut counter = 1;

        while self.is_taken(&candidate) && candidate != source {
            candidate = compose_file_name(base, Some(counter), extension);
            counter += 1;
        }

        candidate
    }

    /// Plan the rename of `document`, or return `None` when it already carries
    /// its resolved name.
    pub fn plan(&mut self, document: &Document, identifier: &str, identity: &Identity) -> Option<RenamePlan> {
        let base = canonical_base(identity, identifier);
        let target = self.resolve_target(&base, &document.extension, &document.file_name);

        if target == document.file_name {
            return None;
        }

        self.reserved.insert(target.clone());
        Some(RenamePlan {
            source: document.file_name.clone(),
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Title;

    const ID: &str = "1234567890123";
    const BASE: &str = "นาย_สมชาย_ใจดี_1234567890123";

    fn somchai() -> Identity {
        Identity {
            title: Title::Nai,
            first_name: "สมชาย".into(),
            last_name: "ใจดี".into(),
        }
    }

    #[test]
    fn plans_canonical_name_without_collision() {
        let doc = Document::new("/d", "เอกสาร_1234567890123.pdf");
        let mut planner = RenamePlanner::new([doc.file_name.clone()]);

        let plan = planner.plan(&doc, ID, &somchai()).unwrap();
        assert_eq!(plan.source, "เอกสาร_1234567890123.pdf");
        assert_eq!(plan.target, "นาย_สมชาย_ใจดี_1234567890123.pdf");
    }

    #[test]
    fn lower_cases_extension() {
        let doc = Document::new("/d", "เอกสาร_1234567890123.JPG");
        let mut planner = RenamePlanner::new([doc.file_name.clone()]);

        let plan = planner.plan(&doc, ID, &somchai()).unwrap();
        assert_eq!(plan.target, format!("{BASE}.jpg"));
    }

    #[test]
    fn probes_numbered_suffixes() {
        let planner = RenamePlanner::new([
            format!("{BASE}.pdf"),
            format!("{BASE}_1.pdf"),
            format!("{BASE}_2.pdf"),
        ]);
        assert_eq!(planner.resolve_target(BASE, "pdf", "เอกสาร_x.pdf"), format!("{BASE}_3.pdf"));
    }

    #[test]
    fn self_collision_stops_resolution() {
        let own = format!("{BASE}_1.pdf");
        let planner = RenamePlanner::new([format!("{BASE}.pdf"), own.clone()]);
        assert_eq!(planner.resolve_target(BASE, "pdf", &own), own);
    }

    #[test]
    fn unchanged_document_is_not_planned() {
        let doc = Document::new("/d", &format!("{BASE}.pdf"));
        let mut planner = RenamePlanner::new([doc.file_name.clone()]);
        assert_eq!(planner.plan(&doc, ID, &somchai()), None);
    }

    #[test]
    fn assigned_targets_are_reserved() {
        let first = Document::new("/d", "เอกสาร_a_1234567890123.pdf");
        let second = Document::new("/d", "เอกสาร_b_1234567890123.pdf");
        let mut planner = RenamePlanner::new([first.file_name.clone(), second.file_name.clone()]);

        let a = planner.plan(&first, ID, &somchai()).unwrap();
        let b = planner.plan(&second, ID, &somchai()).unwrap();
        assert_eq!(a.target, format!("{BASE}.pdf"));
        assert_eq!(b.target, format!("{BASE}_1.pdf"));
        assert!(planner.is_reserved(&b.target));
    }

    #[test]
    fn different_extensions_do_not_collide() {
        let planner = RenamePlanner::new([format!("{BASE}.pdf")]);
        assert_eq!(planner.resolve_target(BASE, "png", "เอกสาร_x.png"), format!("{BASE}.png"));
    }

    #[test]
    fn names_present_on_disk_are_taken() {
        let dir = tempfile::tempdir().unwrap();
        let planner = RenamePlanner::in_directory(dir.path(), ["เอกสาร_x.pdf"]);

        // Appears after the listing snapshot.
        std::fs::write(dir.path().join(format!("{BASE}.pdf")), b"x").unwrap();

        assert!(!planner.is_reserved(&format!("{BASE}.pdf")));
        assert_eq!(planner.resolve_target(BASE, "pdf", "เอกสาร_x.pdf"), format!("{BASE}_1.pdf"));
    }

    #[test]
    fn planner_without_directory_only_uses_the_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(format!("{BASE}.pdf")), b"x").unwrap();

        let planner = RenamePlanner::new(["เอกสาร_x.pdf"]);
        assert_eq!(planner.resolve_target(BASE, "pdf", "เอกสาร_x.pdf"), format!("{BASE}.pdf"));
    }
}
