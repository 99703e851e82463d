/// Last two path segments (`dir/file.ext`), splitting on either separator.
pub fn file_label(path: &str) -> String {
    let mut parts = path.rsplit(['/', '\\']).filter(|part| !part.is_empty());
    match (parts.next(), parts.next()) {
        (Some(name), Some(parent)) => format!("{parent}/{name}"),
        (Some(name), None) => name.to_owned(),
        _ => path.to_owned(),
    }
}

pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_label_keeps_parent_directory() {
        assert_eq!(file_label("repo/src/graph/view.js"), "graph/view.js");
        assert_eq!(file_label(r"C:\repo\src\main.py"), "src/main.py");
        assert_eq!(file_label("main.py"), "main.py");
        assert_eq!(file_label(""), "");
    }

    #[test]
    fn file_name_drops_directories() {
        assert_eq!(file_name("repo/src/view.js"), "view.js");
        assert_eq!(file_name(r"src\lib\"), "lib");
        assert_eq!(file_name("lib.rs"), "lib.rs");
    }
}
