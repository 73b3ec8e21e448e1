//! Mock gateway identity for HTTP tests.
//!
//! Services behind the gateway receive `x-lectern-firebase-uid` (and optionally
//! `x-lectern-email`) after the gateway verified the Firebase ID token. Tests
//! inject these headers directly so no real gateway or token is needed.

use http::{HeaderMap, HeaderName, HeaderValue};

use lectern_core::identity::{EMAIL_HEADER, FIREBASE_UID_HEADER};

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub firebase_uid: String,
    pub email: Option<String>,
}

impl MockAuth {
    pub fn new(firebase_uid: impl Into<String>) -> Self {
        Self {
            firebase_uid: firebase_uid.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(FIREBASE_UID_HEADER),
            HeaderValue::from_str(&self.firebase_uid).expect("firebase uid is a valid header"),
        );
        if let Some(email) = &self.email {
            map.insert(
                HeaderName::from_static(EMAIL_HEADER),
                HeaderValue::from_str(email).expect("email is a valid header"),
            );
        }
        map
    }
}
