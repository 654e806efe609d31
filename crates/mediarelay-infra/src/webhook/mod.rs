//! Workflow-trigger delivery

mod dispatcher;

pub use dispatcher::{
    parse_response_body, sign_payload, NotificationDispatcher, NotificationDispatcherConfig,
    NotificationError, SIGNATURE_HEADER,
};
