pub mod complaint;
pub mod complaint_state;
pub mod complaint_type;
pub mod evidence_file;
pub mod measure_request;
pub mod notification;
pub mod participant;
pub mod person;
pub mod state_history;
pub mod technical_report;

pub use complaint::{Entity as Complaint, Model as ComplaintModel};
pub use complaint_state::{Entity as ComplaintState, Model as ComplaintStateModel};
pub use complaint_type::{Entity as ComplaintType, Model as ComplaintTypeModel};
pub use evidence_file::{Entity as EvidenceFile, Model as EvidenceFileModel};
pub use measure_request::{Entity as MeasureRequest, Model as MeasureRequestModel};
pub use notification::{Entity as Notification, Model as NotificationModel};
pub use participant::{Entity as Participant, Model as ParticipantModel};
pub use person::{Entity as Person, Model as PersonModel};
pub use state_history::{Entity as StateHistory, Model as StateHistoryModel};
pub use technical_report::{Entity as TechnicalReport, Model as TechnicalReportModel};
