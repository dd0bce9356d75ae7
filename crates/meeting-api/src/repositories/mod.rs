//! Repository layer for the Meeting API.
//!
//! Provides database access following the Handler -> Service -> Repository
//! architecture. Every function takes a `&mut SqliteConnection` so the
//! service layer can run several calls inside one transaction.

pub mod meeting_participants;
pub mod meetings;
pub mod participants;
pub mod profiles;

pub use meeting_participants::MeetingParticipantsRepository;
pub use meetings::MeetingsRepository;
pub use participants::ParticipantsRepository;
pub use profiles::ProfilesRepository;
