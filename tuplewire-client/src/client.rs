//! High-level client API.

use crate::error::ClientError;
use crate::transport::Transport;
use bytes::Bytes;
use tuplewire_protocol::{
    CallResponse, Encoder, ErrorCode, PingRequest, Request, Response, SchemaResolver,
    SelectRequest, UpdateRequest, Value,
};

/// Encodes requests, sends them over a transport and decodes the replies.
pub struct Client<T, S> {
    transport: T,
    schema: S,
}

impl<T: Transport, S: SchemaResolver> Client<T, S> {
    pub fn new(transport: T, schema: S) -> Self {
        Self { transport, schema }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// Encodes a request, sends it and returns its sync and the reply payload.
    fn send(&self, request: &dyn Request) -> Result<(u64, Bytes), ClientError> {
        let body = request.body(&self.schema)?;
        let sync = self.transport.next_sync();
        let code = request.code();
        let packet = Encoder::encode_request(sync, code, &body)?;

        tracing::debug!("Sending request sync={} code={:?} ({} bytes)", sync, code, packet.len());
        let payload = self
            .transport
            .round_trip(packet.freeze(), request.call_context())?;
        Ok((sync, payload))
    }

    /// Sends one request and returns its successful response.
    ///
    /// A failure status is turned into [`ClientError::Server`].
    pub fn execute(&self, request: &dyn Request) -> Result<Response, ClientError> {
        let (sync, payload) = self.send(request)?;
        let response = Response::decode(&payload)?;
        tracing::debug!(
            "Request sync={} got response code={:#x} rows={}",
            sync,
            response.code,
            response.data.len()
        );

        check_reply(sync, response.sync, response.error_code(), response.error.as_deref())?;
        Ok(response)
    }

    /// Sends a call request and returns the function's return values.
    pub fn call(&self, request: &dyn Request) -> Result<Vec<Value>, ClientError> {
        let (sync, payload) = self.send(request)?;
        let response = CallResponse::decode(&payload)?;
        tracing::debug!(
            "Call sync={} got response code={:#x} values={}",
            sync,
            response.code,
            response.data.len()
        );

        check_reply(sync, response.sync, response.error_code(), response.error.as_deref())?;
        Ok(response.data)
    }

    /// Pings the server.
    pub fn ping(&self) -> Result<(), ClientError> {
        self.execute(&PingRequest)?;
        Ok(())
    }

    /// Runs a select and returns the matching rows.
    pub fn select(&self, request: &SelectRequest) -> Result<Vec<Vec<Value>>, ClientError> {
        Ok(self.execute(request)?.data)
    }

    /// Runs an update and returns the updated row, if any.
    pub fn update(&self, request: &UpdateRequest) -> Result<Vec<Vec<Value>>, ClientError> {
        Ok(self.execute(request)?.data)
    }
}

/// Verifies the reply belongs to the request and carries no server error.
fn check_reply(
    sync: u64,
    actual: u64,
    code: Option<ErrorCode>,
    message: Option<&str>,
) -> Result<(), ClientError> {
    if actual != sync {
        tracing::warn!("Response sync {} does not match request sync {}", actual, sync);
        return Err(ClientError::SyncMismatch {
            expected: sync,
            actual,
        });
    }

    match code {
        Some(code) => Err(ClientError::Server {
            code,
            message: message.unwrap_or_default().to_string(),
        }),
        None => Ok(()),
    }
}
