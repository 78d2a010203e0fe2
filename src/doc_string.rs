// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Doc strings attached to steps.

use derive_more::with_trait::{Deref, Display};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Free-text block attached to a step, with its optional media type.
#[derive(Clone, Debug, Default, Deref, Deserialize, Display, Eq, PartialEq, Serialize)]
#[display("{content}")]
pub struct DocString {
    /// Text content.
    #[deref]
    pub content: String,

    /// Media type given after the opening delimiter, like `json`.
    pub media_type: Option<String>,
}

impl DocString {
    /// Creates a new [`DocString`].
    #[must_use]
    pub fn new(content: impl Into<String>, media_type: Option<&str>) -> Self {
        Self {
            content: content.into(),
            media_type: media_type.filter(|m| !m.is_empty()).map(str::to_owned),
        }
    }

    /// Decodes the content as JSON.
    ///
    /// # Errors
    ///
    /// If the content isn't a valid JSON representation of `T`.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.content)
    }
}

impl From<&str> for DocString {
    fn from(content: &str) -> Self {
        Self::new(content, None)
    }
}
