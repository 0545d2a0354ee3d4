//! Room id generation.

use matchforge_protocol::RoomId;

/// Source of fresh room identifiers.
///
/// The matchmaker checks every id against the room registry before using
/// it. A repeated id fails that matching tick and leaves the pool as it was.
pub trait RoomIdSource: Send + Sync + 'static {
    fn next_room_id(&self) -> RoomId;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRoomIds;

impl RoomIdSource for UuidRoomIds {
    fn next_room_id(&self) -> RoomId {
        RoomId::new_v4()
    }
}

impl<T: RoomIdSource + ?Sized> RoomIdSource for Box<T> {
    fn next_room_id(&self) -> RoomId {
        (**self).next_room_id()
    }
}
