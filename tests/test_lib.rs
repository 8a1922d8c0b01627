use goapauto::{
    ActionRegistry, ConditionSet, EffectSet, GoapError, Goal, PlanStatus, Planner, State, Value,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn door_registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        registry
            .add_action(
                "open_door",
                ConditionSet::new().with("is_open", false).with("has_key", true),
                EffectSet::new().set("is_open", true),
                1.0,
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_open_door() {
        let registry = door_registry();
        let initial = State::new([("is_open", false), ("has_key", true)]).unwrap();
        let goal = Goal::new("open", 1, ConditionSet::new().with("is_open", true)).unwrap();

        let result = Planner::new().generate_plan(&initial, &goal, &registry).unwrap();

        assert_eq!(result.status, PlanStatus::Found);
        assert_eq!(result.message(), "plan found");
        assert_eq!(result.plan.unwrap(), ["open_door"]);
        assert_eq!(result.stats.total_cost, Some(1.0));
        assert!(result.stats.nodes_expanded >= 1);
    }

    #[test]
    fn test_goal_requiring_lost_key_is_unreachable() {
        let registry = door_registry();
        let initial = State::new([("is_open", false), ("has_key", true)]).unwrap();
        let goal = Goal::new(
            "open_without_key",
            1,
            ConditionSet::new().with("is_open", true).with("has_key", false),
        )
        .unwrap();

        let result = Planner::new().generate_plan(&initial, &goal, &registry).unwrap();

        assert_eq!(result.status, PlanStatus::NoPlan);
        assert_eq!(result.message(), "no plan found");
        assert!(result.plan.is_none());
        assert_eq!(result.stats.total_cost, None);
        // {closed, key} and {open, key}
        assert_eq!(result.stats.nodes_expanded, 2);
    }

    #[test]
    fn test_unlock_then_open() {
        let mut registry = ActionRegistry::new();
        registry
            .add_actions(vec![
                (
                    "unlock_door".to_string(),
                    ConditionSet::new().with("has_key", true),
                    EffectSet::new().set("door_locked", false),
                    1.5,
                ),
                (
                    "open_door".to_string(),
                    ConditionSet::new().with("door_locked", false),
                    EffectSet::new().set("door_open", true),
                    1.0,
                ),
            ])
            .unwrap();

        let initial = State::new([
            ("has_key", true),
            ("door_locked", true),
            ("door_open", false),
        ])
        .unwrap();
        let goal = Goal::new("enter", 1, ConditionSet::new().with("door_open", true)).unwrap();

        let result = Planner::new().generate_plan(&initial, &goal, &registry).unwrap();
        let plan = result.plan.unwrap();
        assert_eq!(plan, ["unlock_door", "open_door"]);
        assert_eq!(result.stats.total_cost, Some(2.5));

        // Replaying the plan reaches the goal
        let end = registry.replay(&initial, &plan).unwrap();
        assert!(goal.is_satisfied(&end));
        assert_eq!(end.get("has_key"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = door_registry();
        let result = registry.add_action(
            "open_door",
            ConditionSet::new(),
            EffectSet::new().set("is_open", true),
            0.1,
        );
        assert!(matches!(result, Err(GoapError::DuplicateName(_))));

        let original = registry.get_action("open_door").unwrap();
        assert_eq!(original.cost(), 1.0);
        assert_eq!(original.preconditions().len(), 2);
    }

    #[test]
    fn test_energy_budget_plan() {
        let mut registry = ActionRegistry::new();
        registry
            .add_action(
                "work",
                ConditionSet::new()
                    .with_predicate("energy", |v| v.as_int().map_or(false, |e| e >= 10)),
                EffectSet::new()
                    .transform("energy", |v| Value::from(v.as_int().unwrap_or(0) - 10))
                    .set("paid", true),
                2.0,
            )
            .unwrap();
        registry
            .add_action(
                "buy_food",
                ConditionSet::new().with("paid", true),
                EffectSet::new().set("fed", true).set("paid", false),
                1.0,
            )
            .unwrap();

        let initial = State::new([
            ("energy", Value::from(25)),
            ("paid", Value::from(false)),
            ("fed", Value::from(false)),
        ])
        .unwrap();
        let goal = Goal::new("eat", 2, ConditionSet::new().with("fed", true)).unwrap();

        let result = Planner::new().generate_plan(&initial, &goal, &registry).unwrap();
        let plan = result.plan.unwrap();
        assert_eq!(plan, ["work", "buy_food"]);

        let end = registry.replay(&initial, &plan).unwrap();
        assert_eq!(end.get("energy"), Some(&Value::Int(15)));
        assert_eq!(end.get("fed"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_unsupported_transform_output_does_not_abort_search() {
        let mut registry = ActionRegistry::new();
        registry
            .add_action(
                "overheat",
                ConditionSet::new(),
                EffectSet::new().transform("temp", |_| Value::from(f64::INFINITY)),
                0.5,
            )
            .unwrap();
        registry
            .add_action(
                "open",
                ConditionSet::new().with("is_open", false),
                EffectSet::new().set("is_open", true),
                1.0,
            )
            .unwrap();

        let initial = State::new([
            ("temp", Value::from(20.0)),
            ("is_open", Value::from(false)),
        ])
        .unwrap();
        let goal = Goal::new("open", 1, ConditionSet::new().with("is_open", true)).unwrap();

        let result = Planner::new().generate_plan(&initial, &goal, &registry).unwrap();
        assert_eq!(result.status, PlanStatus::Found);
        assert_eq!(result.plan.unwrap(), ["open"]);
        assert_eq!(result.stats.successors_skipped, 1);
        assert_eq!(result.stats.nodes_expanded, 2);
    }

    #[test]
    fn test_transform_without_precondition() {
        let mut registry = ActionRegistry::new();
        registry
            .add_action(
                "tick",
                ConditionSet::new(),
                EffectSet::new().transform("turn", |v| Value::from(v.as_int().unwrap_or(0) + 1)),
                1.0,
            )
            .unwrap();
        registry
            .add_action(
                "finish",
                ConditionSet::new().with("turn", 2),
                EffectSet::new().set("done", true),
                1.0,
            )
            .unwrap();

        let initial = State::new([("turn", 0)]).unwrap();
        let goal = Goal::new("finish", 1, ConditionSet::new().with("done", true)).unwrap();
        let result = Planner::new().generate_plan(&initial, &goal, &registry).unwrap();
        assert_eq!(result.plan.unwrap(), ["tick", "tick", "finish"]);

        // Without the fact, tick is skipped rather than failing the whole call
        let result = Planner::new()
            .generate_plan(&State::empty(), &goal, &registry)
            .unwrap();
        assert_eq!(result.status, PlanStatus::NoPlan);
        assert_eq!(result.stats.successors_skipped, 1);
        assert!(matches!(
            registry.replay(&State::empty(), &["tick"]),
            Err(GoapError::MissingFact { .. })
        ));
    }

    #[test]
    fn test_concurrent_planning_shares_inputs() {
        let registry = door_registry();
        let initial = State::new([("is_open", false), ("has_key", true)]).unwrap();
        let goal = Goal::new("open", 1, ConditionSet::new().with("is_open", true)).unwrap();
        let planner = Planner::new();

        let plans: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| planner.generate_plan(&initial, &goal, &registry)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap().plan)
                .collect()
        });

        for plan in plans {
            assert_eq!(plan.unwrap(), ["open_door"]);
        }
    }

    #[test]
    fn test_invalid_inputs_are_rejected_up_front() {
        assert!(matches!(
            Goal::new("empty", 1, ConditionSet::new()),
            Err(GoapError::Validation(_))
        ));

        let mut registry = ActionRegistry::new();
        assert!(matches!(
            registry.add_action("bad", ConditionSet::new(), EffectSet::new(), f64::NAN),
            Err(GoapError::Validation(_))
        ));
        assert!(registry.is_empty());
        assert!(matches!(
            registry.get_action("bad"),
            Err(GoapError::NotFound(_))
        ));
    }
}
