//! In-memory connection used by view and dispatch tests.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Connection, Connector, ReadyState};

/// Everything the mock connection observed.
#[derive(Debug)]
pub struct MockLog {
    pub state: ReadyState,
    pub endpoints: Vec<String>,
    pub sent: Vec<String>,
    pub closes: usize,
}

#[derive(Clone)]
pub struct MockConnector {
    pub log: Rc<RefCell<MockLog>>,
}

impl MockConnector {
    /// Connector whose connections start in `state`.
    #[must_use]
    pub fn new(state: ReadyState) -> Self {
        Self {
            log: Rc::new(RefCell::new(MockLog { state, endpoints: Vec::new(), sent: Vec::new(), closes: 0 })),
        }
    }

    pub fn set_state(&self, state: ReadyState) {
        self.log.borrow_mut().state = state;
    }

    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.log.borrow().sent.clone()
    }

    #[must_use]
    pub fn closes(&self) -> usize {
        self.log.borrow().closes
    }

    #[must_use]
    pub fn endpoints(&self) -> Vec<String> {
        self.log.borrow().endpoints.clone()
    }
}

pub struct MockConnection {
    log: Rc<RefCell<MockLog>>,
}

impl Connector for MockConnector {
    type Connection = MockConnection;

    fn open(&mut self, endpoint: &str) -> MockConnection {
        self.log.borrow_mut().endpoints.push(endpoint.to_owned());
        MockConnection { log: Rc::clone(&self.log) }
    }
}

impl Connection for MockConnection {
    fn ready_state(&self) -> ReadyState {
        self.log.borrow().state
    }

    fn send_text(&self, text: String) {
        self.log.borrow_mut().sent.push(text);
    }

    fn close(&mut self) {
        let mut log = self.log.borrow_mut();
        log.closes += 1;
        log.state = ReadyState::Closed;
    }
}
