// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Helpers turning handler outcomes into failure messages.

use std::any::Any;

/// Extracts a readable message out of a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "Unknown panic payload".to_owned()
    }
}

/// Formats an [`anyhow::Error`] along with its whole cause chain.
#[must_use]
pub fn error_message(err: &anyhow::Error) -> String {
    format!("{err:#}")
}

#[cfg(test)]
mod tests {
    use std::panic;

    use anyhow::Context as _;

    use super::*;

    #[test]
    fn reads_string_and_str_payloads() {
        let payload = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(&*payload), "static");

        let n = 5;
        let payload = panic::catch_unwind(|| panic!("got {n}")).unwrap_err();
        assert_eq!(panic_message(&*payload), "got 5");

        let payload =
            panic::catch_unwind(|| panic::panic_any(42_u8)).unwrap_err();
        assert_eq!(panic_message(&*payload), "Unknown panic payload");
    }

    #[test]
    fn includes_cause_chain() {
        let err = Err::<(), _>(anyhow::anyhow!("inner"))
            .context("outer")
            .unwrap_err();
        assert_eq!(error_message(&err), "outer: inner");
    }
}
