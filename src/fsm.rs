use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace, warn};
use tokio::sync::oneshot;
use tokio::time::timeout;

use crate::dns_parser::{hex_dump, Question, MAX_MESSAGE_LEN};
use crate::instance::Instance;
use crate::session::Session;
use crate::transport::Transport;
use crate::Error;

/// Drives one discovery run over a transport
///
/// A listener task receives datagrams until nothing arrived for a whole
/// browsing window, feeding them to the session and sending whatever
/// follow-up questions it comes up with.
pub struct FSM<T: Transport> {
    transport: Arc<T>,
    session: Session,
    browsing_timeout: Duration,
}

impl<T: Transport> FSM<T> {
    pub fn new(transport: Arc<T>, initial: Question, browsing_timeout: Duration) -> FSM<T> {
        FSM {
            transport,
            session: Session::new(initial),
            browsing_timeout,
        }
    }

    /// Asks the initial question and collects the instances found
    ///
    /// Must be called from within a tokio runtime, the listener is spawned
    /// onto it.
    pub async fn run(self) -> Result<HashSet<Instance>, Error> {
        let transport = self.transport.clone();
        let initial = self.session.initial().clone();
        let packet = initial.encode()?;

        let (ready_tx, ready_rx) = oneshot::channel();
        let listener = tokio::spawn(self.listen(ready_tx));

        // a dropped sender means the listener is gone already
        if ready_rx.await.is_ok() {
            send_packet(&*transport, &initial, &packet).await;
        }

        let session = listener.await?;
        let instances = session.instances();
        debug!("found {} instances for {}", instances.len(), initial.qname);
        Ok(instances)
    }

    async fn listen(mut self, ready: oneshot::Sender<()>) -> Session {
        let mut buf = vec![0u8; MAX_MESSAGE_LEN];
        if ready.send(()).is_err() {
            debug!("initiator went away before listening started");
        }

        loop {
            let len = match timeout(self.browsing_timeout, self.transport.recv(&mut buf)).await {
                Ok(Ok(len)) => len,
                Ok(Err(err)) => {
                    warn!("error receiving packet, ending discovery: {}", err);
                    break;
                }
                Err(_) => {
                    trace!("nothing received for {:?}", self.browsing_timeout);
                    break;
                }
            };

            let data = &buf[..len];
            trace!("received packet:\n{}", hex_dump(data));
            for question in self.session.handle_packet(data) {
                self.ask(&question).await;
            }
        }

        self.session
    }

    async fn ask(&self, question: &Question) {
        match question.encode() {
            Ok(packet) => send_packet(&*self.transport, question, &packet).await,
            Err(err) => warn!("couldn't encode {}: {}", question, err),
        }
    }
}

/// Sends `packet` to every group the transport has joined
async fn send_packet<T: Transport>(transport: &T, question: &Question, packet: &[u8]) {
    for group in transport.groups() {
        trace!("asking {} on {}", question, group);
        match transport.send_to(packet, group).await {
            Ok(sent) if sent == packet.len() => (),
            Ok(_) => warn!("failed to send entire packet"),
            Err(err) => warn!("error sending packet to {}: {}", group, err),
        }
    }
}
