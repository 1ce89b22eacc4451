//! Преобразование имён клавиш из сочетаний в evdev коды.
//!
//! Имена нормализуются: регистр и символ `_` не важны, поэтому GTK-имена
//! (`Return`, `Page_Up`, `KP_Add`, `BackSpace`) и короткие (`enter`, `pageup`)
//! приводят к одному коду.

use once_cell::sync::Lazy;
use std::collections::HashMap;

// Статическая карта клавиш
static KEY_NAME_TO_CODE: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Буквенные клавиши
    for (name, code) in [
        ("a", 30), ("b", 48), ("c", 46), ("d", 32), ("e", 18), ("f", 33),
        ("g", 34), ("h", 35), ("i", 23), ("j", 36), ("k", 37), ("l", 38),
        ("m", 50), ("n", 49), ("o", 24), ("p", 25), ("q", 16), ("r", 19),
        ("s", 31), ("t", 20), ("u", 22), ("v", 47), ("w", 17), ("x", 45),
        ("y", 21), ("z", 44),
    ] {
        map.insert(name, code);
    }

    // Цифровые клавиши (верхний ряд)
    for (name, code) in [
        ("1", 2), ("2", 3), ("3", 4), ("4", 5), ("5", 6),
        ("6", 7), ("7", 8), ("8", 9), ("9", 10), ("0", 11),
    ] {
        map.insert(name, code);
    }

    // Специальные клавиши
    map.insert("space", 57);      // KEY_SPACE
    map.insert("enter", 28);      // KEY_ENTER
    map.insert("return", 28);     // GTK: Return
    map.insert("escape", 1);      // KEY_ESC
    map.insert("esc", 1);
    map.insert("backspace", 14);  // KEY_BACKSPACE
    map.insert("tab", 15);        // KEY_TAB

    // Пунктуация
    map.insert("minus", 12);       // KEY_MINUS
    map.insert("equal", 13);       // KEY_EQUAL
    map.insert("leftbrace", 26);   // KEY_LEFTBRACE
    map.insert("bracketleft", 26); // GTK: bracketleft
    map.insert("rightbrace", 27);  // KEY_RIGHTBRACE
    map.insert("bracketright", 27);
    map.insert("backslash", 43);   // KEY_BACKSLASH
    map.insert("semicolon", 39);   // KEY_SEMICOLON
    map.insert("apostrophe", 40);  // KEY_APOSTROPHE
    map.insert("grave", 41);       // KEY_GRAVE
    map.insert("comma", 51);       // KEY_COMMA
    map.insert("dot", 52);         // KEY_DOT
    map.insert("period", 52);      // GTK: period
    map.insert("slash", 53);       // KEY_SLASH

    // Навигация/редакция
    map.insert("insert", 110);
    map.insert("delete", 111);
    map.insert("home", 102);
    map.insert("end", 107);
    map.insert("pageup", 104);
    map.insert("pagedown", 109);
    map.insert("up", 103);
    map.insert("down", 108);
    map.insert("left", 105);
    map.insert("right", 106);

    // Системные
    map.insert("print", 99);       // KEY_SYSRQ
    map.insert("printscreen", 99);
    map.insert("scrolllock", 70);
    map.insert("pause", 119);

    // Numpad
    for (name, code) in [
        ("kp0", 82), ("kp1", 79), ("kp2", 80), ("kp3", 81), ("kp4", 75),
        ("kp5", 76), ("kp6", 77), ("kp7", 71), ("kp8", 72), ("kp9", 73),
        ("kpdecimal", 83), ("kpdivide", 98), ("kpmultiply", 55),
        ("kpadd", 78), ("kpsubtract", 74), ("kpenter", 96),
    ] {
        map.insert(name, code);
    }

    // Функциональные клавиши
    for (name, code) in [
        ("f1", 59), ("f2", 60), ("f3", 61), ("f4", 62), ("f5", 63), ("f6", 64),
        ("f7", 65), ("f8", 66), ("f9", 67), ("f10", 68), ("f11", 87), ("f12", 88),
    ] {
        map.insert(name, code);
    }

    map
});

fn normalize(key_name: &str) -> String {
    key_name
        .trim()
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Получить evdev код клавиши по её имени
pub fn translate(key_name: &str) -> Result<u16, String> {
    let normalized = normalize(key_name);
    KEY_NAME_TO_CODE
        .get(normalized.as_str())
        .copied()
        .ok_or_else(|| format!("неизвестная клавиша '{}'", key_name.trim()))
}
