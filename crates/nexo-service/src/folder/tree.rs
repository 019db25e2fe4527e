//! Folder tree walks: breadcrumbs, ancestry checks and subtree collection.
//!
//! Every walk issues one request per folder visited. Parent pointers are
//! not trusted to be acyclic, so each walk keeps a visited set and stops at
//! the first repeat.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use nexo_backend::repositories::FolderRepository;
use nexo_core::result::AppResult;
use nexo_core::types::FolderId;
use nexo_entity::folder::Breadcrumbs;

use crate::context::SessionContext;

/// Walks the folder hierarchy.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(folder_repo: Arc<FolderRepository>) -> Self {
        Self { folder_repo }
    }

    /// Root-to-leaf chain ending at `folder`. Empty at the root.
    pub async fn breadcrumbs(
        &self,
        ctx: &SessionContext,
        folder: Option<FolderId>,
    ) -> AppResult<Breadcrumbs> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = folder;

        while let Some(id) = current {
            if !visited.insert(id) {
                warn!(folder_id = %id, "Cycle in folder parents while building breadcrumbs");
                break;
            }
            match self.folder_repo.find_by_id(id, ctx.token()).await? {
                Some(folder) => {
                    current = folder.parent_id;
                    chain.push(folder);
                }
                None => break,
            }
        }

        Ok(Breadcrumbs::from_leaf_first(chain))
    }

    /// Whether `target` is `dragged` itself or one of its descendants.
    ///
    /// Walks parent pointers upward from `target`. A missing row or a
    /// revisited id ends the walk with `false`.
    pub async fn is_within(
        &self,
        ctx: &SessionContext,
        dragged: FolderId,
        target: FolderId,
    ) -> AppResult<bool> {
        let mut visited = HashSet::new();
        let mut current = Some(target);

        while let Some(id) = current {
            if id == dragged {
                return Ok(true);
            }
            if !visited.insert(id) {
                warn!(folder_id = %id, "Cycle in folder parents during ancestry check");
                return Ok(false);
            }
            current = match self.folder_repo.find_by_id(id, ctx.token()).await? {
                Some(folder) => folder.parent_id,
                None => None,
            };
        }

        Ok(false)
    }

    /// `root` and all of its descendants, depth-first pre-order.
    pub async fn collect_subtree(
        &self,
        ctx: &SessionContext,
        root: FolderId,
    ) -> AppResult<Vec<FolderId>> {
        let mut ordered = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            ordered.push(id);
            let children = self.folder_repo.find_child_ids(id, ctx.token()).await?;
            stack.extend(children.into_iter().rev());
        }

        Ok(ordered)
    }
}
