use std::collections::VecDeque;

use super::{
    transport::{Transport, TransportError},
    Operation, Request,
};

/// In-memory [Transport] that acknowledges every command and answers reads
/// from a list of scripted reply bytes. Used to replay captured sessions and
/// to stand in for hardware in tests.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    /// Reply bytes that have not been read yet
    replies: VecDeque<u8>,
    /// Every request that was submitted, in order
    history: Vec<Request>,
}

impl ScriptedTransport {
    pub fn new<I: IntoIterator<Item = u8>>(replies: I) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            history: Vec::new(),
        }
    }

    /// Queue more reply bytes
    pub fn push_replies<I: IntoIterator<Item = u8>>(&mut self, replies: I) {
        self.replies.extend(replies);
    }

    /// Requests submitted so far
    pub fn history(&self) -> &[Request] {
        &self.history
    }

    /// Every command byte submitted so far, across all requests
    pub fn sent(&self) -> Vec<u8> {
        self.history.iter().flat_map(|r| r.commands()).collect()
    }

    /// Number of reply bytes that have not been consumed
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl Transport for ScriptedTransport {
    fn submit(&mut self, request: &mut Request) -> Result<(), TransportError> {
        for op in request.operations_mut() {
            if let Operation::ReadData(value) = op {
                *value = self.replies.pop_front().ok_or(TransportError::Exhausted)?;
            }
        }
        log::trace!("Scripted request: {:02x?}", request.operations());
        self.history.push(request.clone());
        Ok(())
    }
}
