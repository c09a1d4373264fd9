/// Authentication principal. `password` holds a bcrypt hash, never
/// plain text. There is no signup route: the only user is the admin
/// bootstrapped from config when the table is empty.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password: String,
}
