//! Serde models mirroring the persisted document families
//!
//! Documents arrive either as JSON from the API layer or as converted
//! database documents. Identifier fields accept `_id` as an alias so raw
//! documents deserialize without a rename pass.

pub mod analysis;
pub mod blast;
pub mod enums;
pub mod group;
pub mod history;
pub mod hmm;
pub mod index;
pub mod job;
pub mod label;
pub mod ml;
pub mod otu;
pub mod reference;
pub mod sample;
pub mod searchresult;
pub mod session;
pub mod settings;
pub mod subtraction;
pub mod task;
pub mod upload;
pub mod user;
pub mod validators;

pub use analysis::{Analysis, AnalysisFile, AnalysisMinimal, AnalysisSample, AnalysisSearchResult};
pub use blast::NuvsBlast;
pub use enums::{AdministratorRole, HistoryMethod, LibraryType, Permission};
pub use group::{Group, GroupId, GroupMinimal, Permissions};
pub use history::{History, HistoryIndex, HistoryMinimal, HistoryOTU, HistoryOTUVersion, HistorySearchResult};
pub use hmm::{HMMInstalled, HMMMinimal, HMMRelease, HMMSearchResult, HMMSequenceEntry, HMMStatus, HMM};
pub use index::{Index, IndexContributor, IndexFile, IndexMinimal, IndexNested, IndexOTU, IndexSearchResult};
pub use job::{Job, JobAcquired, JobError, JobMinimal, JobNested, JobPing, JobSearchResult, JobState, JobStatus};
pub use label::{Label, LabelMinimal, LabelNested};
pub use ml::MLModelRelease;
pub use otu::{OTUIsolate, OTUIssues, OTUMinimal, OTURemote, OTUSegment, OTUSequence, OTU};
pub use reference::{
    Reference, ReferenceBuild, ReferenceClonedFrom, ReferenceDataType, ReferenceInstalled,
    ReferenceMinimal, ReferenceNested, ReferenceRelease, ReferenceRemotesFrom,
    ReferenceSearchResult, ReferenceUser,
};
pub use sample::{
    Quality, Read, Sample, SampleCache, SampleId, SampleMinimal, SampleNested, SampleSearchResult,
    SampleWorkflows, WorkflowState, WorkflowTag,
};
pub use searchresult::SearchResult;
pub use session::{MinimalSession, Session};
pub use settings::Settings;
pub use subtraction::{
    NucleotideComposition, Subtraction, SubtractionFile, SubtractionMinimal, SubtractionNested,
    SubtractionSearchResult, SubtractionUpload, SubtractionUploadId,
};
pub use task::{Task, TaskMinimal, TaskNested};
pub use upload::{Upload, UploadMinimal, UploadSearchResult};
pub use user::{User, UserB2C, UserMinimal, UserNested, UserSearchResult};
