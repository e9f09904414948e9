//! Filesystem resource operations carried by a workspace edit.
//!
//! Resource operations are applied directly to the filesystem. Unlike text
//! edits they produce no checkpoint: a transaction that fails after a
//! resource operation completed leaves that operation in place.

mod filesystem;
mod handler;

use std::fmt;

pub use filesystem::{EntryKind, FileSystem, LocalFileSystem};
pub use handler::ResourceOperationHandler;

use crate::edit::DocumentId;

/// Discriminant of a [`ResourceOperation`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperationKind {
    /// File creation.
    Create,
    /// File or directory rename.
    Rename,
    /// File or directory deletion.
    Delete,
}

impl fmt::Display for ResourceOperationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Create => "create",
            Self::Rename => "rename",
            Self::Delete => "delete",
        };
        formatter.write_str(label)
    }
}

/// Options controlling file creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Leave an existing target untouched instead of truncating it.
    pub ignore_if_exists: bool,
    /// Truncate an existing target.
    pub overwrite: bool,
}

/// Options controlling renames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameOptions {
    /// Skip the rename when the destination already exists.
    pub ignore_if_exists: bool,
    /// Replace an existing destination.
    pub overwrite: bool,
}

/// Options controlling deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Remove directories together with their contents.
    pub recursive: bool,
    /// Succeed silently when the target is missing.
    pub ignore_if_not_exists: bool,
}

/// A filesystem action requested by a workspace edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOperation {
    /// Create an empty file.
    Create {
        /// Target file.
        uri: DocumentId,
        /// Creation options.
        options: CreateOptions,
    },
    /// Move a file or directory.
    Rename {
        /// Existing path.
        old_uri: DocumentId,
        /// Destination path.
        new_uri: DocumentId,
        /// Rename options.
        options: RenameOptions,
    },
    /// Remove a file or directory.
    Delete {
        /// Target path.
        uri: DocumentId,
        /// Deletion options.
        options: DeleteOptions,
    },
}

impl ResourceOperation {
    /// Builds a create operation.
    #[must_use]
    pub const fn create(uri: DocumentId, options: CreateOptions) -> Self {
        Self::Create { uri, options }
    }

    /// Builds a rename operation.
    #[must_use]
    pub const fn rename(old_uri: DocumentId, new_uri: DocumentId, options: RenameOptions) -> Self {
        Self::Rename {
            old_uri,
            new_uri,
            options,
        }
    }

    /// Builds a delete operation.
    #[must_use]
    pub const fn delete(uri: DocumentId, options: DeleteOptions) -> Self {
        Self::Delete { uri, options }
    }

    /// Returns the kind of operation.
    #[must_use]
    pub const fn kind(&self) -> ResourceOperationKind {
        match self {
            Self::Create { .. } => ResourceOperationKind::Create,
            Self::Rename { .. } => ResourceOperationKind::Rename,
            Self::Delete { .. } => ResourceOperationKind::Delete,
        }
    }

    /// Primary target of the operation (the source for renames).
    #[must_use]
    pub const fn target(&self) -> &DocumentId {
        match self {
            Self::Create { uri, .. } | Self::Delete { uri, .. } => uri,
            Self::Rename { old_uri, .. } => old_uri,
        }
    }
}
