//! Out-of-band notification messages between host and mirror registries.
//!
//! Notifications carry identity and wiring, never payload bytes; snapshot
//! data only ever moves through the triple-buffer slots. The channels are
//! unbounded so the producer thread never blocks on a slow consumer.

use crossbeam_channel::{unbounded, Receiver, Sender};

use triptych_buffer::ChannelHandle;
use triptych_core::{ResourceId, StringId};

/// A message from a host registry to one attached mirror.
#[derive(Clone, Debug)]
pub enum Notification {
    /// A resource was created. The mirror resolves `type_name` against its
    /// own schema registry and attaches the consumer end of `handle`.
    Created {
        /// Cross-thread identity of the new resource.
        id: ResourceId,
        /// Schema lookup key; the layout itself is never transmitted.
        type_name: String,
        /// Declared snapshot size, checked against the locally computed
        /// layout before any byte is interpreted.
        byte_len: u32,
        /// The mirror's own triple-buffer channel for this resource.
        handle: ChannelHandle,
    },
    /// A resource's refcount reached zero. The mirror drops its local
    /// instance, frees derived state, and replies with a [`DisposalAck`].
    Disposed {
        /// The resource being retired.
        id: ResourceId,
    },
    /// A string was interned on the host; mirrors replay it so ids stay
    /// aligned.
    StringInterned {
        /// Id assigned by the host table.
        id: StringId,
        /// The interned value.
        value: String,
    },
}

/// A mirror's confirmation that it holds no live use of a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisposalAck {
    /// The resource the mirror released.
    pub id: ResourceId,
}

/// The host-side endpoints for one attached mirror.
#[derive(Debug)]
pub struct HostLink {
    /// Outbound notifications to the mirror.
    pub notifications: Sender<Notification>,
    /// Inbound disposal acks from the mirror.
    pub acks: Receiver<DisposalAck>,
}

/// The mirror-side endpoints for one host.
#[derive(Debug)]
pub struct MirrorLink {
    /// Inbound notifications from the host.
    pub notifications: Receiver<Notification>,
    /// Outbound disposal acks to the host.
    pub acks: Sender<DisposalAck>,
}

/// Create a connected host/mirror endpoint pair.
pub fn link() -> (HostLink, MirrorLink) {
    let (notify_tx, notify_rx) = unbounded();
    let (ack_tx, ack_rx) = unbounded();
    (
        HostLink {
            notifications: notify_tx,
            acks: ack_rx,
        },
        MirrorLink {
            notifications: notify_rx,
            acks: ack_tx,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_delivers_in_order() {
        let (host, mirror) = link();
        host.notifications
            .send(Notification::Disposed { id: ResourceId(1) })
            .unwrap();
        host.notifications
            .send(Notification::Disposed { id: ResourceId(2) })
            .unwrap();

        let ids: Vec<_> = mirror
            .notifications
            .try_iter()
            .map(|n| match n {
                Notification::Disposed { id } => id,
                other => panic!("unexpected notification: {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec![ResourceId(1), ResourceId(2)]);
    }

    #[test]
    fn acks_flow_back() {
        let (host, mirror) = link();
        mirror.acks.send(DisposalAck { id: ResourceId(7) }).unwrap();
        assert_eq!(
            host.acks.try_recv().unwrap(),
            DisposalAck { id: ResourceId(7) }
        );
    }
}
