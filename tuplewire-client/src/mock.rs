//! In-memory transport for tests.

use crate::error::ClientError;
use crate::transport::Transport;
use bytes::{Bytes, BytesMut};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use tuplewire_protocol::{CallResponse, Context, ErrorCode, Frame, Response, Value};

/// Canned reply for the next round trip.
pub(crate) enum Reply {
    Rows(Vec<Vec<Value>>),
    Values(Vec<Value>),
    Server(ErrorCode, &'static str),
    Transport(&'static str),
    WrongSync,
    Raw(Vec<u8>),
}

#[derive(Default)]
pub(crate) struct MockTransport {
    sync: Cell<u64>,
    replies: RefCell<VecDeque<Reply>>,
    sent: RefCell<Vec<Bytes>>,
    contexts: RefCell<Vec<bool>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, reply: Reply) -> Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    pub(crate) fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }

    /// Header and body of the `n`-th packet sent.
    pub(crate) fn sent(&self, n: usize) -> (Value, Value) {
        let packet = self.sent.borrow()[n].clone();
        let mut buf = BytesMut::from(packet.as_ref());
        let frame = Frame::decode(&mut buf).unwrap().unwrap();
        let mut rd = frame.payload.as_ref();
        let header = rmpv::decode::read_value(&mut rd).unwrap();
        let body = rmpv::decode::read_value(&mut rd).unwrap();
        (header, body)
    }

    /// Whether the `n`-th request carried a context.
    pub(crate) fn had_context(&self, n: usize) -> bool {
        self.contexts.borrow()[n]
    }
}

impl Transport for MockTransport {
    fn next_sync(&self) -> u64 {
        let sync = self.sync.get() + 1;
        self.sync.set(sync);
        sync
    }

    fn round_trip(&self, packet: Bytes, context: Option<&Context>) -> Result<Bytes, ClientError> {
        self.sent.borrow_mut().push(packet);
        self.contexts.borrow_mut().push(context.is_some());

        let sync = self.sync.get();
        let reply = self
            .replies
            .borrow_mut()
            .pop_front()
            .expect("no reply queued");

        let payload = match reply {
            Reply::Rows(rows) => Response::ok(sync, rows).encode()?,
            Reply::Values(values) => CallResponse::ok(sync, values).encode()?,
            Reply::Server(code, message) => Response::error(sync, code, message).encode()?,
            Reply::Transport(message) => return Err(ClientError::Transport(message.to_string())),
            Reply::WrongSync => Response::ok(sync + 100, vec![]).encode()?,
            Reply::Raw(bytes) => bytes,
        };
        Ok(Bytes::from(payload))
    }
}

/// Looks up an integer key in a msgpack map.
pub(crate) fn field(map: &Value, key: u64) -> Value {
    map.as_map()
        .unwrap()
        .iter()
        .find(|(k, _)| k.as_u64() == Some(key))
        .map(|(_, v)| v.clone())
        .unwrap()
}
