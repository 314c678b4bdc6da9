use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct Request {
    name: String,
}

#[derive(Serialize)]
pub struct Response {
    greeting: String,
}

pub(crate) async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let request_id = event.context.request_id;
    tracing::info!(%request_id, "greeting request");

    let greeting = greetings::hello(&event.payload.name).inspect_err(|err| {
        tracing::warn!(%request_id, %err, "rejected greeting request");
    })?;

    Ok(Response { greeting })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context;
    use serde_json::json;

    fn event(payload: serde_json::Value) -> LambdaEvent<Request> {
        let request = serde_json::from_value(payload).unwrap();
        LambdaEvent::new(request, Context::default())
    }

    #[tokio::test]
    async fn greets_named_caller() {
        let response = function_handler(event(json!({ "name": "Alice" })))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "greeting": "Hi, Alice. Welcome!" })
        );
    }

    #[tokio::test]
    async fn empty_name_is_an_error() {
        let err = function_handler(event(json!({ "name": "" })))
            .await
            .err()
            .unwrap();

        assert_eq!(err.to_string(), "empty name");
    }

    #[test]
    fn missing_name_does_not_deserialize() {
        assert!(serde_json::from_value::<Request>(json!({})).is_err());
    }
}
