pub mod plan;

pub use plan::{derive_plan, derive_plan_with_template, ExercisePlan, PlanItem, EXERCISE_TEMPLATE};
