use std::collections::HashSet;

use log::{debug, trace};

use crate::dns_parser::{QueryClass, QueryType, Question, Response};
use crate::instance::Instance;

/// State of one discovery run, without any I/O
///
/// Keeps every question asked so far and every record received that was
/// relevant to one of them. Feeding it datagrams yields the follow-up
/// questions to send.
pub(crate) struct Session {
    initial: Question,
    asked: HashSet<Question>,
    records: Response,
}

impl Session {
    pub fn new(initial: Question) -> Session {
        let mut asked = HashSet::new();
        asked.insert(initial.clone());
        Session {
            initial,
            asked,
            records: Response::default(),
        }
    }

    pub fn initial(&self) -> &Question {
        &self.initial
    }

    /// Processes one received datagram
    ///
    /// Returns the questions that still have to be sent. Datagrams that
    /// don't parse, or don't answer anything we asked, are dropped.
    pub fn handle_packet(&mut self, data: &[u8]) -> Vec<Question> {
        let response = match Response::parse(data) {
            Ok(response) => response,
            Err(err) => {
                debug!("dropping datagram of {} bytes: {}", data.len(), err);
                return Vec::new();
            }
        };

        if !response.answers(&self.asked) {
            debug!(
                "dropping response with {} records answering nothing we asked",
                response.records.len()
            );
            return Vec::new();
        }

        for record in &response.records {
            trace!("received {}", record);
        }
        self.records.merge_with(response);
        self.complete()
    }

    /// Asks for whatever the accumulated PTR and SRV records still lack
    fn complete(&mut self) -> Vec<Question> {
        let mut wanted = Vec::new();

        for (_, target) in self.records.ptr_records() {
            if !self.records.has_srv_for(target) {
                wanted.push(Question::new(target, QueryType::SRV, QueryClass::IN));
            }
            if !self.records.has_txt_for(target) {
                wanted.push(Question::new(target, QueryType::TXT, QueryClass::IN));
            }
        }
        for target in self.records.srv_targets() {
            if !self.records.has_address_for(target) {
                wanted.push(Question::new(target, QueryType::A, QueryClass::IN));
                wanted.push(Question::new(target, QueryType::AAAA, QueryClass::IN));
            }
        }

        wanted
            .into_iter()
            .filter(|question| self.ask(question))
            .collect()
    }

    /// Records `question` as asked, false if it already was
    fn ask(&mut self, question: &Question) -> bool {
        if self.asked.insert(question.clone()) {
            true
        } else {
            debug!("already asked {}", question);
            false
        }
    }

    /// Every instance announced by a PTR answering the initial question
    pub fn instances(&self) -> HashSet<Instance> {
        self.records
            .ptr_records()
            .filter(|(name, _)| *name == self.initial.qname)
            .filter_map(|(_, target)| Instance::from_records(target, &self.records))
            .collect()
    }
}
