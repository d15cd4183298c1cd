//! SQL schema for the Roost SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS accommodations (
    id              TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    description     TEXT NOT NULL DEFAULT '',
    lat             REAL NOT NULL DEFAULT 0,
    lng             REAL NOT NULL DEFAULT 0,
    price_per_night TEXT NOT NULL,            -- decimal string, always > 0
    image_urls      TEXT NOT NULL DEFAULT '[]',
    kind            TEXT NOT NULL DEFAULT '',
    rating          REAL NOT NULL DEFAULT 0,
    reviews_count   INTEGER NOT NULL DEFAULT 0,
    amenities       TEXT NOT NULL DEFAULT '[]'
);

-- Bookings are never deleted. The only UPDATE ever issued touches status.
-- accommodation_id is not a foreign key. Bookings outlive
-- catalog entries and carry their own name/image snapshot.
CREATE TABLE IF NOT EXISTS bookings (
    booking_id          TEXT PRIMARY KEY,
    accommodation_id    TEXT NOT NULL,
    accommodation_name  TEXT NOT NULL,
    accommodation_image TEXT,
    user_id             TEXT NOT NULL,
    check_in            TEXT NOT NULL,        -- YYYY-MM-DD
    check_out           TEXT NOT NULL,        -- YYYY-MM-DD
    number_of_guests    INTEGER NOT NULL,
    total_price         TEXT NOT NULL,        -- decimal string
    status              TEXT NOT NULL,        -- 'pending' | 'confirmed' | 'cancelled'
    booked_at           TEXT NOT NULL,        -- fixed-width RFC 3339 UTC
    CHECK (check_out > check_in),
    CHECK (number_of_guests >= 1),
    CHECK (status IN ('pending', 'confirmed', 'cancelled'))
);

CREATE TABLE IF NOT EXISTS favorites (
    user_id          TEXT NOT NULL,
    accommodation_id TEXT NOT NULL,
    added_at         TEXT NOT NULL,
    PRIMARY KEY (user_id, accommodation_id)
);

CREATE INDEX IF NOT EXISTS bookings_stay_idx   ON bookings(accommodation_id, check_in);
CREATE INDEX IF NOT EXISTS bookings_user_idx   ON bookings(user_id);
CREATE INDEX IF NOT EXISTS bookings_booked_idx ON bookings(booked_at);

PRAGMA user_version = 1;
";

/// Statuses whose bookings hold their dates. A cancelled booking frees them.
pub const OCCUPYING_STATUSES: &str = "('pending', 'confirmed')";
