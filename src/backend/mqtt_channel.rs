//! MQTT channel backed by rumqttc
//!
//! The synchronous rumqttc client only queues requests; a [`Connection`] has
//! to be iterated for anything to reach the broker. [`MqttChannel`] therefore
//! owns one network thread, started by [`MqttChannel::connect`] and joined by
//! [`Channel::close`].
//!
//! Publishes use QoS 0 without retain. Nothing is retried: once the network
//! thread stops, the next publish fails.

use super::channel_trait::{Channel, ChannelStats};
use crate::config::BrokerConfig;
use crate::error::{ReplayError, Result, ResultExt};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use rumqttc::{
    Client, ConnectReturnCode, Connection, ConnectionError, Event, MqttOptions, Outgoing, Packet,
    QoS,
};
use std::thread::JoinHandle;
use std::time::Instant;

/// Capacity of the client's request queue
const REQUEST_CAPACITY: usize = 10;

/// Outcome of the connection handshake reported by the network thread
type Handshake = std::result::Result<(), String>;

/// A connected MQTT session
pub struct MqttChannel {
    client: Client,
    network: Option<JoinHandle<()>>,
    address: String,
    stats: ChannelStats,
    closed: bool,
}

impl std::fmt::Debug for MqttChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttChannel")
            .field("address", &self.address)
            .field("stats", &self.stats)
            .field("closed", &self.closed)
            .finish()
    }
}

impl MqttChannel {
    /// Connect to the broker and wait for it to accept the session
    pub fn connect(config: &BrokerConfig) -> Result<Self> {
        let address = config.address();
        tracing::info!("Connecting to MQTT broker at {} as '{}'", address, config.client_id);

        let mut options = MqttOptions::new(config.client_id.clone(), config.host.clone(), config.port);
        options.set_keep_alive(config.keep_alive());

        let (client, mut connection) = Client::new(options, REQUEST_CAPACITY);
        let (handshake_tx, handshake_rx) = bounded::<Handshake>(1);

        let network = std::thread::Builder::new()
            .name("mqtt-network".to_string())
            .spawn(move || drive_connection(&mut connection, handshake_tx))
            .map_err(ReplayError::from)
            .context("Failed to spawn MQTT network thread")?;

        match handshake_rx.recv_timeout(config.connect_timeout()) {
            Ok(Ok(())) => {
                tracing::info!("Connected to {}", address);
                Ok(Self {
                    client,
                    network: Some(network),
                    address,
                    stats: ChannelStats::default(),
                    closed: false,
                })
            }
            Ok(Err(reason)) => {
                let _ = network.join();
                Err(ReplayError::Channel(format!(
                    "Failed to connect to {}: {}",
                    address, reason
                )))
            }
            // The network thread is left to die with the dropped client
            Err(RecvTimeoutError::Timeout) => Err(ReplayError::Timeout(format!(
                "broker {} did not accept the connection within {:?}",
                address,
                config.connect_timeout()
            ))),
            Err(RecvTimeoutError::Disconnected) => Err(ReplayError::Channel(format!(
                "MQTT network thread for {} exited during connect",
                address
            ))),
        }
    }

    /// `host:port` of the broker
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Publish statistics so far
    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }
}

impl Channel for MqttChannel {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()> {
        if self.closed {
            return Err(ReplayError::Channel(format!(
                "publish on closed connection to {}",
                self.address
            )));
        }

        let start = Instant::now();
        match self
            .client
            .publish(topic, QoS::AtMostOnce, false, payload.to_vec())
        {
            Ok(()) => {
                self.stats
                    .record_success(start.elapsed().as_micros() as u64, payload.len() as u64);
                Ok(())
            }
            Err(e) => {
                self.stats.record_failure();
                Err(ReplayError::from(e).with_context(format!("Failed to publish on '{}'", topic)))
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        self.client
            .disconnect()
            .map_err(ReplayError::from)
            .with_context(|| format!("Failed to disconnect from {}", self.address))?;

        if let Some(handle) = self.network.take() {
            handle
                .join()
                .map_err(|_| ReplayError::Channel("MQTT network thread panicked".to_string()))?;
        }

        tracing::info!(
            "Disconnected from {} after {} messages ({} bytes, avg {:.1} us/publish)",
            self.address,
            self.stats.messages_sent,
            self.stats.bytes_sent,
            self.stats.avg_publish_time_us()
        );
        Ok(())
    }
}

/// Iterate the connection until disconnect or the first error.
///
/// The first CONNACK (or the first error before it) is reported on `handshake`.
fn drive_connection(connection: &mut Connection, handshake: Sender<Handshake>) {
    let mut connected = false;

    for notification in connection.iter() {
        match notification {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code == ConnectReturnCode::Success {
                    connected = true;
                    let _ = handshake.send(Ok(()));
                } else {
                    let _ = handshake.send(Err(format!("broker refused connection: {:?}", ack.code)));
                    break;
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                tracing::debug!("MQTT disconnect sent");
                break;
            }
            Ok(event) => tracing::trace!("MQTT event: {:?}", event),
            Err(ConnectionError::RequestsDone) => {
                tracing::debug!("MQTT client dropped, stopping network thread");
                break;
            }
            Err(e) => {
                if connected {
                    tracing::error!("MQTT connection lost: {}", e);
                } else {
                    let _ = handshake.send(Err(e.to_string()));
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::time::Duration;

    fn unused_local_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_connect_refused_is_fatal() {
        let config = BrokerConfig {
            host: "127.0.0.1".to_string(),
            port: unused_local_port(),
            connect_timeout_secs: 5,
            ..Default::default()
        };

        let err = MqttChannel::connect(&config).unwrap_err();
        assert!(
            matches!(err, ReplayError::Channel(_) | ReplayError::Timeout(_)),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_silent_broker_times_out() {
        // Accepts TCP but never answers CONNECT
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = BrokerConfig {
            host: "127.0.0.1".to_string(),
            port,
            connect_timeout_secs: 1,
            ..Default::default()
        };

        let start = Instant::now();
        let err = MqttChannel::connect(&config).unwrap_err();
        assert!(matches!(err, ReplayError::Timeout(_)), "unexpected error: {err}");
        assert!(start.elapsed() >= Duration::from_secs(1));
        drop(listener);
    }
}
