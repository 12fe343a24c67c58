/// Display name of the OS user: the real name when set, else the login.
pub fn get_name() -> String {
    let name = whoami::realname();
    if name.trim().is_empty() {
        return whoami::username();
    }
    name
}
