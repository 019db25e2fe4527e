//! Root-to-leaf folder chain for the current location.

use serde::{Deserialize, Serialize};

use super::model::Folder;

/// The folders from the drive root down to the current folder.
///
/// Empty at the root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumbs {
    /// Ancestors first, current folder last.
    pub folders: Vec<Folder>,
}

impl Breadcrumbs {
    /// Build from a chain collected leaf-first (walking parent pointers).
    pub fn from_leaf_first(mut chain: Vec<Folder>) -> Self {
        chain.reverse();
        Self { folders: chain }
    }

    /// The current folder, if not at the root.
    pub fn current(&self) -> Option<&Folder> {
        self.folders.last()
    }

    /// Slash-separated path, `/` at the root.
    pub fn display_path(&self) -> String {
        if self.folders.is_empty() {
            return "/".to_string();
        }
        self.folders
            .iter()
            .map(|f| format!("/{}", f.name))
            .collect::<String>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nexo_core::types::{FolderId, UserId};

    fn folder(name: &str, parent: Option<FolderId>) -> Folder {
        Folder {
            id: FolderId::new(),
            name: name.to_string(),
            parent_id: parent,
            owner_id: UserId::new(),
            user_id: None,
            is_private: false,
            created_at: Utc::now(),
            upload_session: None,
        }
    }

    #[test]
    fn test_root_path() {
        assert_eq!(Breadcrumbs::default().display_path(), "/");
        assert!(Breadcrumbs::default().current().is_none());
    }

    #[test]
    fn test_leaf_first_chain_is_reversed() {
        let docs = folder("docs", None);
        let reports = folder("reports", Some(docs.id));
        let crumbs = Breadcrumbs::from_leaf_first(vec![reports.clone(), docs]);
        assert_eq!(crumbs.display_path(), "/docs/reports");
        assert_eq!(crumbs.current(), Some(&reports));
    }
}
