use crate::{split_name, Class, Header, OpCode, Query, Question, RCode, Type};
use std::default::Default;

#[derive(Debug, Default)]
pub struct HeaderBuilder {
    header: Header,
}

impl HeaderBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn build(self) -> Header {
        self.header
    }

    pub fn id(mut self, id: u16) -> Self {
        self.header.id = id;
        self
    }

    pub fn qr(mut self, qr: bool) -> Self {
        self.header.qr = qr;
        self
    }

    pub fn opcode(mut self, opcode: OpCode) -> Self {
        self.header.opcode = opcode;
        self
    }

    pub fn aa(mut self, aa: bool) -> Self {
        self.header.aa = aa;
        self
    }

    pub fn tc(mut self, tc: bool) -> Self {
        self.header.tc = tc;
        self
    }

    pub fn rd(mut self, rd: bool) -> Self {
        self.header.rd = rd;
        self
    }

    pub fn ra(mut self, ra: bool) -> Self {
        self.header.ra = ra;
        self
    }

    pub fn rcode(mut self, rcode: RCode) -> Self {
        self.header.rcode = rcode;
        self
    }

    pub fn qd_count(mut self, count: u16) -> Self {
        self.header.qd_count = count;
        self
    }

    pub fn an_count(mut self, count: u16) -> Self {
        self.header.an_count = count;
        self
    }

    pub fn ns_count(mut self, count: u16) -> Self {
        self.header.ns_count = count;
        self
    }

    pub fn ar_count(mut self, count: u16) -> Self {
        self.header.ar_count = count;
        self
    }
}

/// Builds a standard single question [`Query`].
///
/// Recursion desired is on unless turned off with [`QueryBuilder::rd`].
#[derive(Debug)]
pub struct QueryBuilder {
    id: u16,
    rd: bool,
    q_name: Vec<String>,
    q_type: Type,
    q_class: Class,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            id: 0,
            rd: true,
            q_name: Vec::new(),
            q_type: Default::default(),
            q_class: Default::default(),
        }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn build(self) -> Query {
        Query {
            header: HeaderBuilder::new()
                .id(self.id)
                .rd(self.rd)
                .qd_count(1)
                .build(),
            question: Question {
                q_name: self.q_name,
                q_type: self.q_type,
                q_class: self.q_class,
            },
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn rd(mut self, rd: bool) -> Self {
        self.rd = rd;
        self
    }

    /// Sets the name from dotted text, e.g. `en.lichess.org`.
    pub fn name(mut self, name: &str) -> Self {
        self.q_name = split_name(name).into_iter().map(String::from).collect();
        self
    }

    pub fn labels<S: AsRef<str>>(mut self, labels: &[S]) -> Self {
        self.q_name = labels.iter().map(|l| l.as_ref().to_string()).collect();
        self
    }

    pub fn q_type(mut self, t: Type) -> Self {
        self.q_type = t;
        self
    }

    pub fn class(mut self, cls: Class) -> Self {
        self.q_class = cls;
        self
    }
}
