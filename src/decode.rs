//! JSON response decoding shared by the session manager and the executor.

// self
use crate::{_prelude::*, error::DecodeError, obs::EchoSink};

/// Decodes `body` into `T`, mirroring the raw bytes to `echo` first when one is configured.
pub(crate) fn decode_json<T>(echo: Option<&dyn EchoSink>, body: &[u8]) -> Result<T, DecodeError>
where
	T: DeserializeOwned,
{
	if let Some(echo) = echo {
		echo.echo(body);
	}

	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(DecodeError::Json)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::obs::{BufferEcho, EchoSink};

	#[derive(Debug, PartialEq, Deserialize)]
	struct Page {
		cursor: String,
		more_to_follow: bool,
	}

	#[test]
	fn decode_reports_failing_path() {
		let err = decode_json::<Page>(None, br#"{"cursor":"abc","more_to_follow":"yes"}"#)
			.expect_err("String should not decode into bool.");
		let DecodeError::Json(inner) = err;

		assert_eq!(inner.path().to_string(), "more_to_follow");
	}

	#[test]
	fn decode_mirrors_body_to_echo() {
		let echo = BufferEcho::default();
		let sink: &dyn EchoSink = &echo;
		let page: Page = decode_json(Some(sink), br#"{"cursor":"abc","more_to_follow":false}"#)
			.expect("Valid page should decode.");

		assert_eq!(page, Page { cursor: "abc".into(), more_to_follow: false });
		assert_eq!(echo.texts(), vec![r#"{"cursor":"abc","more_to_follow":false}"#.to_owned()]);
	}
}
