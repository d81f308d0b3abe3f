mod cancellation_create_date_idx;
mod cancellation_create_table;
mod client_order_create_client_idx;
mod client_order_create_table;
mod meal_selection_create_date_idx;
mod meal_selection_create_table;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "mealdrop",
    "m0001",
    vec_box![],
    vec_box![
        client_order_create_table::Operation,
        client_order_create_client_idx::Operation,
        cancellation_create_table::Operation,
        cancellation_create_date_idx::Operation,
        meal_selection_create_table::Operation,
        meal_selection_create_date_idx::Operation
    ]
);
