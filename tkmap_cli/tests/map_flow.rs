
#[cfg(test)]
pub mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::test_utils::tests::{full_world, pulled_world};
    use tkmap_app::{WorldMap, test_utils::tests::MockTransport};
    use tkmap_game::{
        models::{cell::CellCategory, snapshot::MapSummary},
        test_utils::WorldFixtureOptions,
    };
    use tkmap_types::{
        Result,
        errors::{ApplicationError, MapError, TransportError},
        map::{Position, cell_id, reverse_id},
    };

    #[tokio::test]
    async fn test_full_world_counts() -> Result<()> {
        let (transport, map) = full_world().await?;

        assert_eq!(
            map.summary(),
            MapSummary {
                cells: 35721,
                villages: 2376,
                abandoned_valleys: 5814,
                oases: 1226,
                wilderness: 26305,
                grey_villages: 115,
                unoccupied_oases: 747,
                players: 1624,
                inactive_players: 114,
                kingdoms: 161,
            }
        );
        assert_eq!(map.villages().count(), 2376);
        assert_eq!(map.abandoned_valleys().count(), 5814);
        assert_eq!(map.oases().count(), 1226);
        assert_eq!(map.wilderness().count(), 26305);

        // every cell of every region came back, and the categories don't overlap
        assert_eq!(map.len(), 729 * 49);
        assert_eq!(map.region_ids().count(), 729);
        assert_eq!(2376 + 5814 + 1226 + 26305, map.len());

        // one oasis also carries `resType`: counted by marker alone there are
        // 5815 resource cells, 35722 in total across the four markers
        let with_res_type = map
            .cells()
            .filter(|c| c.village.is_none() && c.res_type.is_some())
            .count();
        assert_eq!(with_res_type, 5815);
        let oasis_valley = map
            .oases()
            .find(|c| c.res_type.is_some())
            .expect("an oasis with a resType marker");
        assert_eq!(oasis_valley.category(), CellCategory::Oasis);
        assert_eq!(map.kingdoms().count(), 161);
        assert_eq!(map.players().count(), 1624);
        assert_eq!(map.active_players().count(), 1624 - 114);

        let requests = transport.region_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].region_ids().count(), 729);
        Ok(())
    }

    #[tokio::test]
    async fn test_cells_round_trip_through_coordinates() -> Result<()> {
        let (_, map) = full_world().await?;

        for cell in map.cells().step_by(97) {
            let position = reverse_id(cell.id.as_u32() as i64)?;
            let found = map.cell_at(position.x, position.y).expect("cell at its own position");
            assert_eq!(found.id, cell.id);
            assert_eq!(cell_id(position.x, position.y)?, cell.id);
        }

        assert!(map.cell_at(0, 0).is_some());
        assert!(map.cell_at(150, 150).is_none());
        assert!(map.cell_at(20000, 0).is_none());
        assert!(map.cell_by_id(cell_id(0, 1)?).is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_lookups() -> Result<()> {
        let (_, map) = full_world().await?;

        let player = map.player(Some("Player 1"), None).expect("player by name");
        assert_eq!(player.id(), "1");
        assert_eq!(map.player(None, Some("1624")).map(|p| p.id()), Some("1624"));
        assert!(map.player(Some("player not found"), None).is_none());
        assert!(map.player(None, Some("1625")).is_none());

        let kingdom = map.kingdom(Some("K1"), None).expect("kingdom by tag");
        assert_eq!(kingdom.id(), "1");
        assert_eq!(map.kingdom(None, Some("161")).and_then(|k| k.name()), Some("K161"));
        assert!(map.kingdom(Some("kingdom not found"), None).is_none());

        // player 41 is the first one with a kingdom
        let member = map.player(None, Some("41")).expect("kingdom member");
        let kingdom = map.kingdom_of(member).expect("member's kingdom");
        assert!(map.players_in(kingdom.id()).any(|p| p.id() == "41"));
        assert!(map.kingdom_of(player).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_grey_villages_belong_to_kingdomless_players() -> Result<()> {
        let (_, map) = full_world().await?;

        for village in map.grey_villages() {
            let owner = map.owner_of(village).expect("generated villages have known owners");
            assert_eq!(owner.kingdom_id(), None);
        }
        for oasis in map.unoccupied_oases() {
            assert_eq!(oasis.category(), CellCategory::Oasis);
            assert!(map.owner_of(oasis).is_none());
        }
        let owned: usize = map.players().map(|p| map.villages_of(p.id()).count()).sum();
        assert_eq!(owned, 2376);
        Ok(())
    }

    #[tokio::test]
    async fn test_entity_fields() -> Result<()> {
        let (_, map) = full_world().await?;

        let village = map.villages().next().expect("at least one village");
        assert_eq!(village.field("landscape")?, json!("9013"));
        assert_eq!(village.field("id")?, json!(village.id.to_string()));
        assert_eq!(
            village.field("adsf"),
            Err(MapError::FieldNotFound {
                entity: "Cell",
                key: "adsf".to_string()
            })
        );

        let player = map.player(None, Some("1")).expect("player 1");
        assert_eq!(player.field("name")?, json!("Player 1"));
        assert!(player.field("adsf").is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_village_lookup() -> Result<()> {
        let (_, map) = full_world().await?;

        let village = map.villages().next().expect("at least one village");
        let name = village.village_name().expect("generated villages are named");
        assert_eq!(map.village(Some(name), None).map(|v| v.id), Some(village.id));
        assert_eq!(map.village(None, Some(village.id)).map(|v| v.id), Some(village.id));

        let oasis = map.oases().next().expect("at least one oasis");
        assert!(map.village(None, Some(oasis.id)).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_group_is_skipped() -> Result<()> {
        let transport = Arc::new(MockTransport::new());
        transport.set_region_response(json!({
            "response": {
                "1": {
                    "region": {"536887296": [{"id": "536887296", "resType": "4446"}]},
                    "player": {"119": {"name": "Punisher", "active": "1"}},
                },
                "2": {"error": {"message": "not visible"}},
                "3": "garbage",
            }
        }));

        let mut map = WorldMap::new(transport);
        assert_eq!(map.pull_all().await?, 1);
        assert_eq!(map.abandoned_valleys().count(), 1);
        assert_eq!(map.players().count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failing_pull_leaves_snapshot_untouched() -> Result<()> {
        let (transport, mut map) = full_world().await?;
        let before = map.summary();

        transport.push_region_result(Err(TransportError::Status {
            status: 502,
            body: "Bad Gateway".to_string(),
        }));
        let result = map.pull_all().await;
        assert!(matches!(
            result,
            Err(ApplicationError::Transport(TransportError::Status { status: 502, .. }))
        ));
        assert_eq!(map.summary(), before);
        Ok(())
    }

    #[tokio::test]
    async fn test_pulls_merge_and_replace() -> Result<()> {
        let (transport, mut map) = pulled_world(&WorldFixtureOptions {
            villages: 10,
            abandoned_valleys: 10,
            oases: 10,
            oasis_valleys: 0,
            wilderness: 19,
            kingdoms: 1,
            players: 4,
            inactive_players: 1,
            kingdomless_players: 1,
            grey_villages: 2,
            unoccupied_oases: 5,
            seed: 1,
        })
        .await?;
        assert_eq!(map.len(), 49);

        // the origin turns into a village of a new player; nothing else is lost
        transport.push_region_result(Ok(json!({
            "response": {
                "1": {
                    "region": {"536887296": [
                        {"id": "536887296", "owner": "500", "village": {"name": "Rome", "playerId": "500"}},
                    ]},
                    "player": {"500": {"name": "Punisher", "kingdomId": "1", "active": "1"}},
                }
            }
        })));
        map.pull(&[cell_id(0, 0)?]).await?;

        assert_eq!(map.len(), 49);
        assert_eq!(map.cell_at(0, 0).map(|c| c.category()), Some(CellCategory::Village));
        assert_eq!(map.village(Some("Rome"), None).map(|c| c.position()), Some(Position::new(0, 0)));
        assert_eq!(map.players().count(), 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_detail_calls() -> Result<()> {
        let (transport, map) = full_world().await?;
        let player = map.player(None, Some("1")).expect("player 1");
        let cell = map.cell_at(0, 0).expect("origin cell");

        transport.set_cache_entry("Player:1", json!({"name": "Player 1", "villages": []}));
        transport.set_cache_entry(&format!("MapDetails:{}", cell.id), json!({"hasNPC": 0}));
        transport.set_cache_entry(
            "Collection:HeroItem:1",
            json!({"cache": [{"name": "HeroItem:20922", "data": {}}]}),
        );

        assert_eq!(map.player_details(player).await?["name"], "Player 1");
        assert_eq!(map.cell_details(cell).await?, json!({"hasNPC": 0}));
        assert_eq!(map.hero_equipment(player).await?[0]["name"], "HeroItem:20922");

        let names: Vec<String> = transport
            .cache_requests()
            .into_iter()
            .flat_map(|r| r.names)
            .collect();
        assert_eq!(
            names,
            vec![
                "Player:1".to_string(),
                format!("MapDetails:{}", cell.id),
                "Collection:HeroItem:1".to_string()
            ]
        );
        Ok(())
    }
}
