mod eater_preference;
mod menu_item;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "menuwise",
    "m0001",
    vec_box![],
    vec_box![
        menu_item::CreateTable,
        menu_item::CreateIdx1,
        eater_preference::CreateTable
    ]
);
