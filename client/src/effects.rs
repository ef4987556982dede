//! Turns reducer effects into HTTP calls and their results into messages.

use todo_core::{
    delete_sequentially, ApiError, CreateTodo, Effect, Msg, Todo, TodoClient, UpdateTodo,
};
use uuid::Uuid;

use crate::transport::Transport;

pub struct Effects<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> Effects<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Run one effect to completion. Always yields exactly one message.
    pub fn perform(&self, effect: Effect) -> Msg {
        match effect {
            Effect::FetchAll => Msg::Loaded(logged("fetch todos", self.fetch_all())),
            Effect::Create { text } => Msg::Created(logged("add todo", self.create(text))),
            Effect::SetCompleted { id, completed } => Msg::Toggled {
                id,
                result: logged("update todo", self.set_completed(id, completed)),
            },
            Effect::Delete { id } => Msg::Deleted {
                id,
                result: logged("delete todo", self.delete(id)),
            },
            Effect::DeleteMany(ids) => {
                let report = delete_sequentially(&ids, |id| self.delete(id));
                if let Some((id, err)) = &report.failed {
                    tracing::warn!(
                        %id,
                        error = %err,
                        deleted = report.deleted.len(),
                        skipped = report.skipped.len(),
                        "clear completed stopped"
                    );
                }
                Msg::ClearedCompleted(report)
            }
        }
    }

    fn fetch_all(&self) -> Result<Vec<Todo>, ApiError> {
        let resp = self.transport.execute(self.client.build_list_todos())?;
        self.client.parse_list_todos(resp)
    }

    fn create(&self, text: String) -> Result<Todo, ApiError> {
        let req = self.client.build_create_todo(&CreateTodo { text })?;
        let resp = self.transport.execute(req)?;
        self.client.parse_create_todo(resp)
    }

    fn set_completed(&self, id: Uuid, completed: bool) -> Result<Option<Todo>, ApiError> {
        let req = self.client.build_update_todo(id, &UpdateTodo { completed })?;
        let resp = self.transport.execute(req)?;
        self.client.parse_update_todo(resp)
    }

    fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let resp = self.transport.execute(self.client.build_delete_todo(id))?;
        self.client.parse_delete_todo(resp).map(|_| ())
    }
}

fn logged<V>(action: &str, result: Result<V, ApiError>) -> Result<V, ApiError> {
    if let Err(err) = &result {
        tracing::warn!(error = %err, "failed to {action}");
    }
    result
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use todo_core::{HttpMethod, HttpRequest, HttpResponse};

    use super::*;

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    struct Scripted {
        responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
        seen: Mutex<Vec<(HttpMethod, String)>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<HttpResponse, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::default(),
            }
        }
    }

    impl Transport for Scripted {
        fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push((req.method, req.path));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected request")
        }
    }

    fn effects(responses: Vec<Result<HttpResponse, ApiError>>) -> Effects<Scripted> {
        Effects::new(TodoClient::new("http://test/api"), Scripted::new(responses))
    }

    fn deleted() -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse::new(200, r#"{"message":"Todo deleted"}"#))
    }

    #[test]
    fn network_failure_becomes_failed_load() {
        let fx = effects(vec![Err(ApiError::NetworkError("refused".into()))]);
        match fx.perform(Effect::FetchAll) {
            Msg::Loaded(Err(ApiError::NetworkError(_))) => {}
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn null_update_becomes_none() {
        let fx = effects(vec![Ok(HttpResponse::new(200, "null"))]);
        let id = Uuid::from_u128(7);
        match fx.perform(Effect::SetCompleted { id, completed: true }) {
            Msg::Toggled {
                id: got,
                result: Ok(None),
            } => assert_eq!(got, id),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn delete_many_runs_in_order_and_stops_on_failure() {
        let ids: Vec<Uuid> = (1..=3).map(Uuid::from_u128).collect();
        let fx = effects(vec![deleted(), Ok(HttpResponse::new(500, "boom"))]);

        let report = match fx.perform(Effect::DeleteMany(ids.clone())) {
            Msg::ClearedCompleted(report) => report,
            other => panic!("unexpected message: {other:?}"),
        };
        assert_eq!(report.deleted, vec![ids[0]]);
        assert_eq!(report.failed.as_ref().map(|(id, _)| *id), Some(ids[1]));
        assert_eq!(report.skipped, vec![ids[2]]);

        let seen = fx.transport.seen.lock().unwrap();
        let paths: Vec<String> = seen.iter().map(|(_, p)| p.clone()).collect();
        let expected: Vec<String> = ids[..2]
            .iter()
            .map(|id| format!("http://test/api/todos/{id}"))
            .collect();
        assert_eq!(paths, expected);
        assert!(seen.iter().all(|(m, _)| *m == HttpMethod::Delete));
    }
}
