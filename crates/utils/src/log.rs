// This file is part of Wrapline.
//
// Wrapline is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Wrapline is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Wrapline.
// If not, see https://www.gnu.org/licenses/.

//! Helper traits for logging errors that are handled locally

use std::fmt::{Debug, Display};

use tracing::Level;

/// Trait for logging an error if there is one on a result-like object
pub trait LogOnError {
    /// This will log an error if there is one, but will preserve the original error type
    fn log_on_error<C>(self, context: C) -> Self
    where
        C: Display;

    /// This will log at the given level if there is an error, but will preserve the original error type
    fn log_on_error_level<C>(self, level: Level, context: C) -> Self
    where
        C: Display;
}

/// Trait for swallowing an error after logging it
pub trait OkOrLog<T> {
    /// Log the error with the given context and discard it
    fn ok_or_log<C>(self, context: C) -> Option<T>
    where
        C: Display;
}

impl<T, E> LogOnError for Result<T, E>
where
    E: Debug,
{
    fn log_on_error<C>(self, context: C) -> Result<T, E>
    where
        C: Display,
    {
        self.log_on_error_level(Level::ERROR, context)
    }

    fn log_on_error_level<C>(self, level: Level, context: C) -> Result<T, E>
    where
        C: Display,
    {
        if let Err(error) = &self {
            log_at_level(level, &format!("{context}: {error:?}"));
        }
        self
    }
}

impl<T, E> OkOrLog<T> for Result<T, E>
where
    E: Debug,
{
    fn ok_or_log<C>(self, context: C) -> Option<T>
    where
        C: Display,
    {
        self.log_on_error(context).ok()
    }
}

fn log_at_level(level: Level, s: &str) {
    match level {
        Level::TRACE => tracing::trace!("{s}"),
        Level::DEBUG => tracing::debug!("{s}"),
        Level::INFO => tracing::info!("{s}"),
        Level::WARN => tracing::warn!("{s}"),
        Level::ERROR => tracing::error!("{s}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_on_error_preserves_result() {
        let ok: Result<u8, String> = Ok(1);
        assert_eq!(ok.log_on_error("unused"), Ok(1));

        let err: Result<u8, String> = Err("boom".to_string());
        assert_eq!(
            err.log_on_error_level(Level::WARN, "context"),
            Err("boom".to_string())
        );
    }

    #[test]
    fn test_ok_or_log() {
        let ok: Result<u8, String> = Ok(7);
        assert_eq!(ok.ok_or_log("unused"), Some(7));

        let err: Result<u8, String> = Err("boom".to_string());
        assert_eq!(err.ok_or_log("context"), None);
    }
}
