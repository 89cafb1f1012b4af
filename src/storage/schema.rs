//! Database schema definitions for the gym store.
//!
//! Foreign key columns are declared but not enforced, so a dangling reference
//! reads back as a missing neighbor instead of failing the write.

/// SQL schema for creating all entity and join tables.
pub const SCHEMA: &str = r#"
-- Locations table
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL
);

-- Rooms table
CREATE TABLE IF NOT EXISTS rooms (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    max_capacity INTEGER NOT NULL,
    location_id INTEGER REFERENCES locations(id)
);

-- Trainers table
CREATE TABLE IF NOT EXISTS trainers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    mail TEXT NOT NULL,
    phone TEXT NOT NULL,
    specialization TEXT NOT NULL
);

-- Memberships table
CREATE TABLE IF NOT EXISTS memberships (
    id INTEGER PRIMARY KEY,
    membership_type TEXT NOT NULL,
    price REAL NOT NULL
);

-- Members table
CREATE TABLE IF NOT EXISTS members (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    mail TEXT NOT NULL,
    phone TEXT NOT NULL,
    registration_date TEXT NOT NULL,
    membership_id INTEGER REFERENCES memberships(id)
);

-- Equipment table
CREATE TABLE IF NOT EXISTS equipment (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    quantity INTEGER NOT NULL
);

-- Fitness classes table
CREATE TABLE IF NOT EXISTS fitness_classes (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    trainer_id INTEGER REFERENCES trainers(id),
    room_id INTEGER REFERENCES rooms(id),
    participants_count INTEGER NOT NULL,
    location_id INTEGER REFERENCES locations(id)
);

CREATE INDEX IF NOT EXISTS idx_fitness_classes_trainer_id ON fitness_classes(trainer_id);
CREATE INDEX IF NOT EXISTS idx_fitness_classes_start_time ON fitness_classes(start_time);

-- Feedback table
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY,
    member_id INTEGER REFERENCES members(id),
    fitness_class_id INTEGER REFERENCES fitness_classes(id),
    rating INTEGER NOT NULL,
    comment TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_feedback_class_id ON feedback(fitness_class_id);

-- Reservations table
CREATE TABLE IF NOT EXISTS reservations (
    id INTEGER PRIMARY KEY,
    member_id INTEGER REFERENCES members(id),
    fitness_class_id INTEGER REFERENCES fitness_classes(id),
    reserved_at TEXT NOT NULL
);

-- Class registrations (class <-> member)
CREATE TABLE IF NOT EXISTS class_members (
    fitness_class_id INTEGER NOT NULL,
    member_id INTEGER NOT NULL,
    PRIMARY KEY (fitness_class_id, member_id)
);

-- Required equipment (class <-> equipment)
CREATE TABLE IF NOT EXISTS class_equipment (
    fitness_class_id INTEGER NOT NULL,
    equipment_id INTEGER NOT NULL,
    PRIMARY KEY (fitness_class_id, equipment_id)
);
"#;

/// Schema version tracking table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 2;

/// SQL for migration from v1 to v2 (reverse lookups on the join tables)
pub const MIGRATION_V1_TO_V2: &str = r#"
CREATE INDEX IF NOT EXISTS idx_class_members_member_id ON class_members(member_id);
CREATE INDEX IF NOT EXISTS idx_class_equipment_equipment_id ON class_equipment(equipment_id);
CREATE INDEX IF NOT EXISTS idx_members_membership_id ON members(membership_id);
"#;

/// Tables holding entity rows, in creation order.
pub const ENTITY_TABLES: &[&str] = &[
    "locations",
    "rooms",
    "trainers",
    "memberships",
    "members",
    "equipment",
    "fitness_classes",
    "feedback",
    "reservations",
];

/// Join tables recording many-to-many relations.
pub const JOIN_TABLES: &[&str] = &["class_members", "class_equipment"];
