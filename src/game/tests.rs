#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::game::outcome::{
        final_notation, resolve_with_factor, ShotQuality,
    };
    use crate::game::state::{apply_toss_choice, perform_toss, MatchState, MatchStatus};
    use crate::game::types::{
        BatIntent, BowlIntent, BowlType, DeliveryNotation, InningsScore, MarginKind, ShotType,
        TossChoice,
    };
    use crate::server::registry::types::{Player, RegistryError};

    fn player(id: &str) -> Player {
        Player {
            id: id.to_string(),
            username: id.to_uppercase(),
        }
    }

    fn fresh_match() -> MatchState {
        MatchState::new(player("p1"), player("p2"))
    }

    fn dot(state: &mut MatchState) {
        state.apply_delivery(DeliveryNotation::Runs(0), "dot".to_string());
    }

    fn bowl_intent(direction: f32) -> BowlIntent {
        BowlIntent {
            kind: BowlType::Fast,
            power: 0.8,
            direction,
            spin: 0.1,
        }
    }

    fn bat_intent(timing: f32, direction: f32, power: f32) -> BatIntent {
        BatIntent {
            shot: ShotType::Drive,
            power,
            timing,
            direction,
        }
    }

    #[test]
    fn test_toss_requires_two_players() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = perform_toss(&[player("p1")], &mut rng).unwrap_err();
        assert_eq!(err, RegistryError::InsufficientPlayers);
    }

    #[test]
    fn test_toss_picks_a_member() {
        let members = [player("p1"), player("p2")];
        let mut rng = StdRng::seed_from_u64(1);
        let winner = perform_toss(&members, &mut rng).unwrap();
        assert!(members.iter().any(|p| p.id == winner.id));
    }

    #[test]
    fn test_toss_choice_bat_assigns_winner_as_batting_side() {
        let members = [player("p1"), player("p2")];
        let state = apply_toss_choice(&members, "p1", TossChoice::Bat).unwrap();
        assert_eq!(state.team_a.id, "p1");
        assert_eq!(state.team_b.id, "p2");
        assert_eq!(state.striker_id, "p1");
        assert_eq!(state.bowler_id, "p2");
        assert_eq!(state.innings_index, 1);
        assert_eq!(state.innings_scores[0], InningsScore::default());
    }

    #[test]
    fn test_toss_choice_bowl_assigns_opponent_as_batting_side() {
        let members = [player("p1"), player("p2")];
        let state = apply_toss_choice(&members, "p1", TossChoice::Bowl).unwrap();
        assert_eq!(state.team_a.id, "p2");
        assert_eq!(state.team_b.id, "p1");
        assert_eq!(state.striker_id, "p2");
    }

    #[test]
    fn test_toss_choice_rejects_outsider() {
        let members = [player("p1"), player("p2")];
        let err = apply_toss_choice(&members, "intruder", TossChoice::Bat).unwrap_err();
        assert_eq!(err, RegistryError::PlayerNotInRoom);
    }

    #[test]
    fn test_toss_choice_parse() {
        assert_eq!(TossChoice::parse("bat").unwrap(), TossChoice::Bat);
        assert_eq!(TossChoice::parse("bowl").unwrap(), TossChoice::Bowl);
        assert_eq!(
            TossChoice::parse("field").unwrap_err(),
            RegistryError::InvalidChoice
        );
    }

    #[test]
    fn test_wide_scores_but_does_not_advance_over() {
        let mut state = fresh_match();
        state.apply_delivery(DeliveryNotation::Wide, "wide".to_string());
        let score = &state.innings_scores[0];
        assert_eq!(score.runs, 1);
        assert_eq!(score.extras, 1);
        assert_eq!(score.legal_balls, 0);
        assert_eq!(state.ball_in_over, 0);
        assert_eq!(state.recent_deliveries[0].notation, "WD");
    }

    #[test]
    fn test_no_ball_scores_but_does_not_advance_over() {
        let mut state = fresh_match();
        state.apply_delivery(DeliveryNotation::NoBall, "no ball".to_string());
        let score = &state.innings_scores[0];
        assert_eq!(score.runs, 1);
        assert_eq!(score.extras, 1);
        assert_eq!(score.legal_balls, 0);
        assert_eq!(state.ball_in_over, 0);
        assert_eq!(state.recent_deliveries[0].notation, "NB");
    }

    #[test]
    fn test_six_legal_balls_roll_the_over_and_swap_roles() {
        let mut state = fresh_match();
        for _ in 0..5 {
            dot(&mut state);
        }
        assert_eq!(state.over, 0);
        assert_eq!(state.ball_in_over, 5);
        assert_eq!(state.striker_id, "p1");
        dot(&mut state);
        assert_eq!(state.over, 1);
        assert_eq!(state.ball_in_over, 0);
        assert_eq!(state.striker_id, "p2");
        assert_eq!(state.bowler_id, "p1");
    }

    #[test]
    fn test_extras_between_legal_balls_do_not_delay_the_over() {
        let mut state = fresh_match();
        for _ in 0..5 {
            dot(&mut state);
        }
        state.apply_delivery(DeliveryNotation::Wide, "wide".to_string());
        assert_eq!(state.over, 0);
        dot(&mut state);
        assert_eq!(state.over, 1);
        assert_eq!(state.innings_scores[0].legal_balls, 6);
        assert_eq!(state.innings_scores[0].extras, 1);
    }

    #[test]
    fn test_boundary_and_six_counters() {
        let mut state = fresh_match();
        state.apply_delivery(DeliveryNotation::Runs(4), "four".to_string());
        state.apply_delivery(DeliveryNotation::Runs(6), "six".to_string());
        let score = &state.innings_scores[0];
        assert_eq!(score.runs, 10);
        assert_eq!(score.boundaries, 1);
        assert_eq!(score.sixes, 1);
    }

    #[test]
    fn test_recent_deliveries_capped_most_recent_first() {
        let mut state = fresh_match();
        for n in 0..12u32 {
            state.apply_delivery(DeliveryNotation::Runs(n % 4), format!("ball {}", n));
        }
        assert_eq!(state.recent_deliveries.len(), 10);
        assert_eq!(state.recent_deliveries[0].description, "ball 11");
    }

    #[test]
    fn test_ten_wickets_end_the_innings_immediately() {
        let mut state = fresh_match();
        for _ in 0..10 {
            state.apply_delivery(DeliveryNotation::Wicket, "out".to_string());
        }
        assert_eq!(state.innings_scores[0].wickets, 10);
        assert_eq!(state.innings_index, 2);
        assert_eq!(state.over, 0);
        assert_eq!(state.ball_in_over, 0);
        assert_eq!(state.status, MatchStatus::InProgress);
    }

    #[test]
    fn test_wickets_never_exceed_ten() {
        let mut state = fresh_match();
        for _ in 0..10 {
            state.apply_delivery(DeliveryNotation::Wicket, "out".to_string());
        }
        // Second innings: wickets keep their own counter.
        for _ in 0..10 {
            state.apply_delivery(DeliveryNotation::Wicket, "out".to_string());
        }
        assert_eq!(state.innings_scores[0].wickets, 10);
        assert_eq!(state.innings_scores[1].wickets, 10);
        assert!(state.is_complete());
    }

    #[test]
    fn test_thirty_legal_balls_end_the_first_innings_and_swap_sides() {
        let mut state = fresh_match();
        for _ in 0..30 {
            dot(&mut state);
        }
        assert_eq!(state.innings_index, 2);
        assert_eq!(state.innings_scores[0].legal_balls, 30);
        assert_eq!(state.innings_scores[0].overs_display(), "5.0");
        assert_eq!(state.over, 0);
        assert_eq!(state.ball_in_over, 0);
        // The side that bowled first now bats.
        assert_eq!(state.striker_id, "p2");
        assert_eq!(state.bowler_id, "p1");
        assert_eq!(state.status, MatchStatus::InProgress);
    }

    #[test]
    fn test_first_innings_side_wins_by_runs() {
        let mut state = fresh_match();
        for _ in 0..30 {
            state.apply_delivery(DeliveryNotation::Runs(1), "single".to_string());
        }
        for _ in 0..30 {
            dot(&mut state);
        }
        assert!(state.is_complete());
        let result = state.result.as_ref().unwrap();
        assert_eq!(result.winner_id.as_deref(), Some("p1"));
        assert_eq!(result.margin_kind, MarginKind::Runs);
        assert_eq!(result.margin_value, Some(30));
        assert_eq!(result.summary, "P1 won by 30 runs!");
    }

    #[test]
    fn test_chasing_side_wins_by_wickets() {
        let mut state = fresh_match();
        for _ in 0..30 {
            dot(&mut state);
        }
        // Chase: six singles, three wickets down, then dots to the close.
        for _ in 0..6 {
            state.apply_delivery(DeliveryNotation::Runs(1), "single".to_string());
        }
        for _ in 0..3 {
            state.apply_delivery(DeliveryNotation::Wicket, "out".to_string());
        }
        for _ in 0..21 {
            dot(&mut state);
        }
        assert!(state.is_complete());
        let result = state.result.as_ref().unwrap();
        assert_eq!(result.winner_id.as_deref(), Some("p2"));
        assert_eq!(result.margin_kind, MarginKind::Wickets);
        assert_eq!(result.margin_value, Some(7));
        assert_eq!(result.summary, "P2 won by 7 wickets!");
    }

    #[test]
    fn test_equal_runs_is_a_tie() {
        let mut state = fresh_match();
        for _ in 0..30 {
            state.apply_delivery(DeliveryNotation::Runs(1), "single".to_string());
        }
        for _ in 0..30 {
            state.apply_delivery(DeliveryNotation::Runs(1), "single".to_string());
        }
        assert!(state.is_complete());
        let result = state.result.as_ref().unwrap();
        assert_eq!(result.margin_kind, MarginKind::Tie);
        assert_eq!(result.winner_id, None);
        assert_eq!(result.margin_value, None);
        assert_eq!(result.summary, "Match tied!");
    }

    #[test]
    fn test_completed_match_ignores_further_deliveries() {
        let mut state = fresh_match();
        for _ in 0..60 {
            dot(&mut state);
        }
        assert!(state.is_complete());
        let frozen = state.clone();
        state.apply_delivery(DeliveryNotation::Runs(6), "late six".to_string());
        state.apply_delivery(DeliveryNotation::Wicket, "late out".to_string());
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_overs_display_is_derived_from_legal_balls() {
        let score = InningsScore {
            legal_balls: 7,
            ..InningsScore::default()
        };
        assert_eq!(score.overs_display(), "1.1");
    }

    #[test]
    fn test_intent_clamping() {
        let bowl = BowlIntent {
            kind: BowlType::Spin,
            power: 5.0,
            direction: -3.0,
            spin: 9.0,
        }
        .clamped();
        assert_eq!(bowl.power, 1.0);
        assert_eq!(bowl.direction, -1.0);
        assert_eq!(bowl.spin, 0.5);

        let bat = BatIntent {
            shot: ShotType::Pull,
            power: -0.5,
            timing: 2.0,
            direction: 1.5,
        }
        .clamped();
        assert_eq!(bat.power, 0.0);
        assert_eq!(bat.timing, 1.0);
        assert_eq!(bat.direction, 1.0);
    }

    #[test]
    fn test_perfect_shot_with_max_luck_is_a_boundary_never_a_wicket() {
        // Perfect timing, matched direction, full power: effectiveness is 1.0.
        let bowl = bowl_intent(0.3);
        let bat = bat_intent(0.0, 0.3, 1.0);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = resolve_with_factor(&bowl, &bat, 1.3, &mut rng);
            assert!(outcome.shot_effectiveness >= 0.8);
            assert_eq!(outcome.quality, ShotQuality::Perfect);
            assert!(!outcome.is_wicket);
            assert!(outcome.is_boundary);
            assert!(outcome.runs == 4 || outcome.runs == 6);
        }
    }

    #[test]
    fn test_poor_connection_never_scores_more_than_one() {
        // Hopeless timing against the opposite line: effectiveness is 0.
        let bowl = bowl_intent(-1.0);
        let bat = bat_intent(0.5, 1.0, 1.0);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = resolve_with_factor(&bowl, &bat, 1.0, &mut rng);
            assert_eq!(outcome.quality, ShotQuality::Poor);
            assert!(outcome.is_wicket || outcome.runs <= 1);
            assert!(!outcome.is_boundary);
        }
    }

    #[test]
    fn test_decent_connection_caps_at_two_runs() {
        // timing 0.1 -> 0.5 timing effectiveness; opposite lines -> 0.3 overall.
        let bowl = bowl_intent(-1.0);
        let bat = bat_intent(0.1, 1.0, 1.0);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = resolve_with_factor(&bowl, &bat, 1.0, &mut rng);
            assert_eq!(outcome.quality, ShotQuality::Decent);
            assert!(outcome.is_wicket || outcome.runs <= 2);
        }
    }

    #[test]
    fn test_good_connection_caps_at_four() {
        // Perfect timing, 1.2 of direction error: effectiveness 0.76.
        let bowl = bowl_intent(-0.6);
        let bat = bat_intent(0.0, 0.6, 1.0);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = resolve_with_factor(&bowl, &bat, 1.3, &mut rng);
            assert_eq!(outcome.quality, ShotQuality::Good);
            assert!(outcome.is_wicket || outcome.runs <= 4);
            assert_eq!(outcome.is_boundary, !outcome.is_wicket && outcome.runs == 4);
        }
    }

    #[test]
    fn test_resolver_is_deterministic_under_a_seed() {
        let bowl = bowl_intent(0.2);
        let bat = bat_intent(0.05, 0.1, 0.9);
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = resolve_with_factor(&bowl, &bat, 1.0, &mut rng_a);
        let b = resolve_with_factor(&bowl, &bat, 1.0, &mut rng_b);
        assert_eq!(a.runs, b.runs);
        assert_eq!(a.is_wicket, b.is_wicket);
        assert_eq!(a.description, b.description);
    }

    #[test]
    fn test_wicket_verdict_is_never_turned_into_an_extra() {
        let bowl = bowl_intent(-1.0);
        let bat = bat_intent(0.5, 1.0, 1.0);
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = resolve_with_factor(&bowl, &bat, 1.0, &mut rng);
            if outcome.is_wicket {
                let notation = final_notation(&outcome, &mut rng);
                assert_eq!(notation, DeliveryNotation::Wicket);
            }
        }
    }

    #[test]
    fn test_non_wicket_notation_carries_the_verdict_runs() {
        let bowl = bowl_intent(0.3);
        let bat = bat_intent(0.0, 0.3, 1.0);
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = resolve_with_factor(&bowl, &bat, 1.3, &mut rng);
            match final_notation(&outcome, &mut rng) {
                DeliveryNotation::Runs(n) => assert_eq!(n, outcome.runs),
                DeliveryNotation::Wide | DeliveryNotation::NoBall => {}
                DeliveryNotation::Wicket => panic!("perfect shot cannot be a wicket"),
            }
        }
    }
}
