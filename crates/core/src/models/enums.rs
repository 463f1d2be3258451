//! Small wire enums shared across document families

use serde::{Deserialize, Serialize};
use std::fmt;

/// A permission a user or group can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CancelJob,
    CreateRef,
    CreateSample,
    ModifyHmm,
    ModifySubtraction,
    RemoveFile,
    RemoveJob,
    UploadFile,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Permission::CancelJob => "cancel_job",
            Permission::CreateRef => "create_ref",
            Permission::CreateSample => "create_sample",
            Permission::ModifyHmm => "modify_hmm",
            Permission::ModifySubtraction => "modify_subtraction",
            Permission::RemoveFile => "remove_file",
            Permission::RemoveJob => "remove_job",
            Permission::UploadFile => "upload_file",
        };

        write!(f, "{name}")
    }
}

/// The administrator role attached to a user, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdministratorRole {
    Base,
    Full,
    Settings,
    Spaces,
    Users,
}

/// The kind of change a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMethod {
    AddIsolate,
    Clone,
    Create,
    CreateSequence,
    Edit,
    EditIsolate,
    EditSequence,
    Import,
    Remote,
    Remove,
    RemoveIsolate,
    RemoveSequence,
    SetAsDefault,
    Update,
}

/// The library preparation used for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryType {
    Amplicon,
    Normal,
    Srna,
}
