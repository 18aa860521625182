use serde::{Deserialize, Serialize};

/// Fixed exercise template, in payoff order: points discount the earlier
/// entries first. Base reps are scaled by the day's loss count.
pub const EXERCISE_TEMPLATE: &[(&str, i64)] = &[
    ("Squats", 40),
    ("Lunges", 20),
    ("Push-ups", 20),
    ("Diamond push-ups", 10),
    ("Towel curls", 15),
    ("Supermans", 15),
    ("Plank (seconds)", 60),
    ("Crunches", 30),
    ("Jumping jacks", 30),
    ("Squat jumps", 20),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    pub name: String,
    pub reps: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExercisePlan {
    /// Points left over after discounting every exercise
    pub remaining_points: i64,
    pub items: Vec<PlanItem>,
}

/// Derives the day's workout from loss count and earned points using the
/// default template
pub fn derive_plan(losses: u32, points: i64) -> ExercisePlan {
    derive_plan_with_template(EXERCISE_TEMPLATE, losses, points)
}

/// Walks the template in order, scaling base reps by `losses` and greedily
/// spending `points`: a fully paid exercise is dropped, a partially paid one
/// keeps the unpaid remainder. The order-sensitive greedy walk is the
/// tie-break: earlier template entries are paid off preferentially.
///
/// Zero losses means an empty plan regardless of points.
pub fn derive_plan_with_template(
    template: &[(&str, i64)],
    losses: u32,
    mut points: i64,
) -> ExercisePlan {
    if losses == 0 {
        return ExercisePlan {
            remaining_points: points,
            items: Vec::new(),
        };
    }

    let mut items = Vec::new();
    for (name, base_reps) in template {
        let reps = base_reps * losses as i64;
        if points >= reps {
            points -= reps;
        } else if points > 0 {
            items.push(PlanItem {
                name: name.to_string(),
                reps: reps - points,
            });
            points = 0;
        } else {
            items.push(PlanItem {
                name: name.to_string(),
                reps,
            });
        }
    }

    ExercisePlan {
        remaining_points: points,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SMALL: &[(&str, i64)] = &[("A", 10), ("B", 5)];

    #[test]
    fn zero_losses_means_empty_plan() {
        let plan = derive_plan(0, 1000);
        assert!(plan.items.is_empty());
        assert_eq!(plan.remaining_points, 1000);
    }

    #[test]
    fn zero_points_yields_unmodified_base_reps() {
        let plan = derive_plan_with_template(SMALL, 2, 0);
        assert_eq!(
            plan.items,
            vec![
                PlanItem {
                    name: "A".to_string(),
                    reps: 20
                },
                PlanItem {
                    name: "B".to_string(),
                    reps: 10
                },
            ]
        );
        assert_eq!(plan.remaining_points, 0);
    }

    #[test]
    fn points_pay_off_earlier_exercises_first() {
        // Base reps at 2 losses: A=20, B=10. 25 points clear A and leave
        // B at 5 reps.
        let plan = derive_plan_with_template(SMALL, 2, 25);
        assert_eq!(
            plan.items,
            vec![PlanItem {
                name: "B".to_string(),
                reps: 5
            }]
        );
        assert_eq!(plan.remaining_points, 0);
    }

    #[test]
    fn surplus_points_clear_everything() {
        let plan = derive_plan_with_template(SMALL, 2, 37);
        assert!(plan.items.is_empty());
        assert_eq!(plan.remaining_points, 7);
    }

    #[rstest]
    #[case(20, vec![("B", 10)], 0)] // exact payoff drops the item
    #[case(19, vec![("A", 1), ("B", 10)], 0)]
    #[case(30, vec![], 0)]
    fn boundary_payoffs(
        #[case] points: i64,
        #[case] expected: Vec<(&str, i64)>,
        #[case] remaining: i64,
    ) {
        let plan = derive_plan_with_template(SMALL, 2, points);
        let got: Vec<(&str, i64)> = plan
            .items
            .iter()
            .map(|i| (i.name.as_str(), i.reps))
            .collect();
        assert_eq!(got, expected);
        assert_eq!(plan.remaining_points, remaining);
    }

    #[test]
    fn default_template_scales_with_losses() {
        let plan = derive_plan(3, 0);
        assert_eq!(plan.items.len(), EXERCISE_TEMPLATE.len());
        assert_eq!(plan.items[0].name, "Squats");
        assert_eq!(plan.items[0].reps, 120);
    }
}
