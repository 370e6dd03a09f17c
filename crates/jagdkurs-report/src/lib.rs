//! jagdkurs-report: printable exam sheets and question-report delivery.

pub mod html;
pub mod notify;

pub use html::{generate_exam_html, write_exam_html, SheetOptions};
pub use notify::{ChannelStatus, DeliveryReceipt, Notifier, QuestionReport};
