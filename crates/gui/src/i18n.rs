use std::sync::atomic::{AtomicU8, Ordering};

use crate::state::Language;

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Language {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Language::Ru,
        _ => Language::En,
    }
}

pub fn set_lang(l: Language) {
    CURRENT_LANG.store(
        match l {
            Language::En => 0,
            Language::Ru => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Language::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.open" => if ru { "Открыть облако точек..." } else { "Open point cloud..." },
        "menu.open_title" => if ru { "Открыть PCD" } else { "Open PCD" },
        "menu.demo" => if ru { "Демо-сцена" } else { "Demo scene" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.cuboid_list" => if ru { "Список кубоидов" } else { "Cuboid list" },
        "menu.status_bar" => if ru { "Строка состояния" } else { "Status bar" },
        "menu.reset_camera" => if ru { "Сбросить камеру  R" } else { "Reset camera  R" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        "menu.annotate" => if ru { "Разметка" } else { "Annotate" },
        "menu.orientation" => if ru { "Ориентация кубоида" } else { "Cuboid orientation" },
        "menu.keep_create" => if ru { "Оставаться в режиме создания" } else { "Stay in create mode" },
        "menu.settings" => if ru { "Настройки..." } else { "Settings..." },

        // ── Orientation policies ────────────────────────────
        "policy.axis_aligned" => if ru { "По осям" } else { "Axis aligned" },
        "policy.three_point_frame" => if ru { "По трём точкам" } else { "Three point frame" },

        // ── Toolbar ─────────────────────────────────────────
        "tb.create_cuboid" => if ru { "Создать кубоид" } else { "Create cuboid" },
        "tb.create_cuboid_tip" => if ru { "Выберите три точки облака  C" } else { "Pick three cloud points  C" },
        "tb.cancel" => if ru { "Отмена  Esc" } else { "Cancel  Esc" },
        "tb.reset_camera" => if ru { "Сбросить камеру" } else { "Reset camera" },

        // ── Cuboid list ─────────────────────────────────────
        "list.title" => if ru { "Кубоиды" } else { "Cuboids" },
        "list.empty" => if ru { "Кубоидов пока нет" } else { "No cuboids yet" },
        "list.center" => if ru { "Центр" } else { "Center" },
        "list.size" => if ru { "Размер" } else { "Size" },
        "list.oriented" => if ru { "повёрнут" } else { "oriented" },

        // ── Status bar ──────────────────────────────────────
        "status.points_selected" => if ru { "из 3 точек выбрано" } else { "of 3 points selected" },
        "status.ready" => if ru { "Готово" } else { "Ready" },
        "status.cuboids" => if ru { "Кубоиды" } else { "Cuboids" },
        "status.points" => if ru { "Точки" } else { "Points" },
        "status.no_cloud" => if ru { "Облако не загружено" } else { "No point cloud" },
        "hint.pick" => if ru { "Кликните по точке облака" } else { "Click a cloud point" },
        "hint.esc" => if ru { "Esc — отмена" } else { "Esc to cancel" },

        // ── Settings window ─────────────────────────────────
        "settings.title" => if ru { "Настройки" } else { "Settings" },
        "settings.annotation" => if ru { "Разметка" } else { "Annotation" },
        "settings.pick_threshold" => if ru { "Радиус захвата точки" } else { "Point pick radius" },
        "settings.min_separation" => if ru { "Мин. расстояние между точками" } else { "Min. pick separation" },
        "settings.camera" => if ru { "Камера" } else { "Camera" },
        "settings.rotate_speed" => if ru { "Скорость вращения" } else { "Rotate speed" },
        "settings.damping" => if ru { "Инерция" } else { "Damping" },
        "settings.damping_factor" => if ru { "Коэффициент инерции" } else { "Damping factor" },
        "settings.viewport" => if ru { "Вьюпорт" } else { "Viewport" },
        "settings.bg_color" => if ru { "Цвет фона" } else { "Background color" },
        "settings.point_color" => if ru { "Цвет точек" } else { "Point color" },
        "settings.point_size" => if ru { "Размер точек" } else { "Point size" },
        "settings.marker_color" => if ru { "Цвет маркеров" } else { "Marker color" },
        "settings.wireframe" => if ru { "Толщина рёбер" } else { "Edge thickness" },
        "settings.ui" => if ru { "Интерфейс" } else { "Interface" },
        "settings.font_size" => if ru { "Размер шрифта" } else { "Font size" },
        "settings.apply" => if ru { "Применить" } else { "Apply" },
        "settings.reset" => if ru { "Сбросить" } else { "Reset" },
        "settings.close" => if ru { "Закрыть" } else { "Close" },

        // ── Errors ──────────────────────────────────────────
        "error.load" => if ru { "Не удалось загрузить" } else { "Failed to load" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}
