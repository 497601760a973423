#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crate::server::registry::rooms::RoomTable;
    use crate::server::registry::types::{Player, RegistryError};

    fn player(id: &str) -> Player {
        Player {
            id: id.to_string(),
            username: id.to_uppercase(),
        }
    }

    #[test]
    fn test_create_room() {
        let mut table = RoomTable::new();
        let room = table.create_room("Arena", player("p1")).unwrap();
        assert_eq!(room.name, "Arena");
        assert_eq!(room.host_id, "p1");
        assert_eq!(room.players().len(), 1);
        assert!(room.is_member("p1"));
    }

    #[test]
    fn test_create_room_rejects_blank_name() {
        let mut table = RoomTable::new();
        let err = table.create_room("   ", player("p1")).unwrap_err();
        assert_eq!(err, RegistryError::InvalidName);
        assert!(table.rooms().is_empty());
    }

    #[test]
    fn test_create_room_rejects_host_already_in_a_room() {
        let mut table = RoomTable::new();
        table.create_room("First", player("p1")).unwrap();
        let err = table.create_room("Second", player("p1")).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyInRoom);
        assert_eq!(table.rooms().len(), 1);
    }

    #[test]
    fn test_join_room() {
        let mut table = RoomTable::new();
        let room_id = table.create_room("Arena", player("p1")).unwrap().id;
        let room = table.join_room(room_id, player("p2")).unwrap();
        assert_eq!(room.players().len(), 2);
        assert!(room.is_member("p2"));
    }

    #[test]
    fn test_join_unknown_room() {
        let mut table = RoomTable::new();
        let err = table
            .join_room(uuid::Uuid::new_v4(), player("p1"))
            .unwrap_err();
        assert_eq!(err, RegistryError::RoomNotFound);
    }

    #[test]
    fn test_rejoin_is_idempotent() {
        let mut table = RoomTable::new();
        let room_id = table.create_room("Arena", player("p1")).unwrap().id;
        table.join_room(room_id, player("p2")).unwrap();
        let room = table.join_room(room_id, player("p2")).unwrap();
        assert_eq!(room.players().len(), 2);
    }

    #[test]
    fn test_room_is_full_at_two_players() {
        let mut table = RoomTable::new();
        let room_id = table.create_room("Arena", player("p1")).unwrap().id;
        table.join_room(room_id, player("p2")).unwrap();
        let err = table.join_room(room_id, player("p3")).unwrap_err();
        assert_eq!(err, RegistryError::RoomFull);
    }

    #[test]
    fn test_player_cannot_belong_to_two_rooms() {
        let mut table = RoomTable::new();
        let first_id = table.create_room("First", player("p1")).unwrap().id;
        let second_id = table.create_room("Second", player("p2")).unwrap().id;
        let err = table.join_room(second_id, player("p1")).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyInOtherRoom);
        assert_eq!(table.find_room_of("p1"), Some(first_id));
    }

    #[test]
    fn test_leave_reassigns_the_host() {
        let mut table = RoomTable::new();
        let room_id = table.create_room("Arena", player("p1")).unwrap().id;
        table.join_room(room_id, player("p2")).unwrap();
        let report = table.leave_room(room_id, "p1").unwrap();
        assert!(!report.room_closed);
        assert!(report.host_reassigned);
        let room = table.get(room_id).unwrap();
        assert_eq!(room.host_id, "p2");
        assert_eq!(room.players().len(), 1);
    }

    #[test]
    fn test_last_leave_closes_the_room() {
        let mut table = RoomTable::new();
        let room_id = table.create_room("Arena", player("p1")).unwrap().id;
        let report = table.leave_room(room_id, "p1").unwrap();
        assert!(report.room_closed);
        assert!(table.rooms().is_empty());
    }

    #[test]
    fn test_leave_by_non_member_is_a_no_op() {
        let mut table = RoomTable::new();
        let room_id = table.create_room("Arena", player("p1")).unwrap().id;
        assert!(table.leave_room(room_id, "stranger").is_none());
        assert_eq!(table.get(room_id).unwrap().players().len(), 1);
    }

    #[test]
    fn test_rooms_list_in_creation_order() {
        let mut table = RoomTable::new();
        table.create_room("First", player("p1")).unwrap();
        table.create_room("Second", player("p2")).unwrap();
        table.create_room("Third", player("p3")).unwrap();
        let names: Vec<&str> = table.rooms().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_disconnect_and_reconnect_flags() {
        let mut table = RoomTable::new();
        let room_id = table.create_room("Arena", player("p1")).unwrap().id;
        assert!(table.is_connected("p1"));

        let marked = table.mark_disconnected("p1", Instant::now());
        assert_eq!(marked, Some(room_id));
        assert!(!table.is_connected("p1"));
        assert!(table.get(room_id).unwrap().members[0].disconnected_at.is_some());

        let rehomed = table.mark_reconnected("p1");
        assert_eq!(rehomed, Some(room_id));
        assert!(table.is_connected("p1"));
        assert!(table.get(room_id).unwrap().members[0].disconnected_at.is_none());
    }

    #[test]
    fn test_disconnect_of_unknown_player() {
        let mut table = RoomTable::new();
        table.create_room("Arena", player("p1")).unwrap();
        assert!(table.mark_disconnected("ghost", Instant::now()).is_none());
        assert!(table.mark_reconnected("ghost").is_none());
        assert!(!table.is_connected("ghost"));
    }

    #[test]
    fn test_reconnect_within_grace_keeps_the_seat() {
        // The eviction timer re-checks connection state before removing anyone,
        // so a reconnect inside the grace window must make that check pass.
        let mut table = RoomTable::new();
        let room_id = table.create_room("Arena", player("p1")).unwrap().id;
        table.join_room(room_id, player("p2")).unwrap();

        table.mark_disconnected("p2", Instant::now());
        table.mark_reconnected("p2");

        // What the expiry callback does when it fires late.
        if !table.is_connected("p2") {
            table.leave_room(room_id, "p2");
        }
        assert_eq!(table.get(room_id).unwrap().players().len(), 2);
    }

    #[test]
    fn test_expiry_evicts_a_player_who_never_returned() {
        let mut table = RoomTable::new();
        let room_id = table.create_room("Arena", player("p1")).unwrap().id;
        table.join_room(room_id, player("p2")).unwrap();

        table.mark_disconnected("p2", Instant::now());
        if !table.is_connected("p2") {
            table.leave_room(room_id, "p2");
        }
        let room = table.get(room_id).unwrap();
        assert_eq!(room.players().len(), 1);
        assert!(!room.is_member("p2"));
    }

    #[test]
    fn test_summary_reports_match_flag() {
        let mut table = RoomTable::new();
        let room_id = table.create_room("Arena", player("p1")).unwrap().id;
        table.join_room(room_id, player("p2")).unwrap();
        let room = table.get(room_id).unwrap();

        let idle = room.summary(false).unwrap();
        assert!(!idle.match_in_progress);
        assert_eq!(idle.host.id, "p1");
        assert_eq!(idle.players.len(), 2);

        let busy = room.summary(true).unwrap();
        assert!(busy.match_in_progress);
    }
}
