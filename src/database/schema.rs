//! Idempotent schema bootstrap, executed at server startup.
//!
//! Statements run in order; later tables reference earlier ones.

pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS admins (
        id            BIGSERIAL PRIMARY KEY,
        email         VARCHAR(200) NOT NULL UNIQUE,
        password_hash VARCHAR(256) NOT NULL,
        name          VARCHAR(200) NOT NULL,
        is_active     BOOLEAN NOT NULL DEFAULT TRUE,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_logs (
        id         BIGSERIAL PRIMARY KEY,
        admin_id   BIGINT REFERENCES admins(id) ON DELETE SET NULL,
        action     VARCHAR(50) NOT NULL,
        entity     VARCHAR(50),
        entity_id  BIGINT,
        details    JSONB,
        ip_address VARCHAR(45),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id         BIGSERIAL PRIMARY KEY,
        name       VARCHAR(100) NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id         BIGSERIAL PRIMARY KEY,
        name       VARCHAR(100) NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS providers (
        id          BIGSERIAL PRIMARY KEY,
        name        VARCHAR(200) NOT NULL,
        contact     VARCHAR(200),
        phone       VARCHAR(50),
        description TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id          BIGSERIAL PRIMARY KEY,
        name        VARCHAR(200) NOT NULL,
        description TEXT,
        price       NUMERIC(12, 2) NOT NULL,
        image_path  VARCHAR(500),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_images (
        id            BIGSERIAL PRIMARY KEY,
        product_id    BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        image_path    VARCHAR(500) NOT NULL,
        is_primary    BOOLEAN NOT NULL DEFAULT FALSE,
        display_order INT NOT NULL DEFAULT 0,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_product_images_product
        ON product_images (product_id, display_order)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_categories (
        product_id  BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        category_id BIGINT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
        PRIMARY KEY (product_id, category_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_tags (
        product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        tag_id     BIGINT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        PRIMARY KEY (product_id, tag_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_providers (
        product_id  BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        provider_id BIGINT NOT NULL REFERENCES providers(id) ON DELETE CASCADE,
        PRIMARY KEY (product_id, provider_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS site_content (
        id         BIGSERIAL PRIMARY KEY,
        key        VARCHAR(100) NOT NULL UNIQUE,
        title      VARCHAR(200),
        content    TEXT,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_by BIGINT REFERENCES admins(id) ON DELETE SET NULL
    )
    "#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_idempotent() {
        for statement in STATEMENTS {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "non-idempotent statement: {statement}"
            );
        }
    }
}
