//! Demo catalog for a fresh installation: the eight smart-glasses categories
//! and a few sample applications. Only runs against an empty catalog.

use crate::db::{applications, categories, Database};
use crate::error::CatalogResult;
use chrono::{Duration, Utc};
use common::model::application::Application;
use common::model::category::Category;
use log::info;

struct SeedCategory {
    name: &'static str,
    icon: &'static str,
    description: &'static str,
}

struct SeedApp {
    category: usize,
    name: &'static str,
    package_name: &'static str,
    version: &'static str,
    icon: &'static str,
    download_url: &'static str,
    file_size_bytes: u64,
    developer: &'static str,
    rating: f64,
    downloads: i64,
    days_ago: i64,
    min_android_version: &'static str,
    permissions: &'static [&'static str],
    features: &'static [&'static str],
}

const CATEGORIES: [SeedCategory; 8] = [
    SeedCategory { name: "游戏娱乐", icon: "🎮", description: "适配智能眼镜的游戏应用，提供沉浸式游戏体验" },
    SeedCategory { name: "影音视频", icon: "🎬", description: "专为眼镜优化的视频播放和影音应用" },
    SeedCategory { name: "阅读学习", icon: "📖", description: "电子书阅读和学习辅助应用" },
    SeedCategory { name: "工具效率", icon: "🛠️", description: "提升效率的实用工具应用" },
    SeedCategory { name: "运动健康", icon: "🏃", description: "运动追踪和健康管理应用" },
    SeedCategory { name: "手机应用", icon: "📱", description: "可与眼镜搭配使用的手机应用，如蓝牙键盘、虚拟鼠标等配件类应用" },
    SeedCategory { name: "创意设计", icon: "🎨", description: "图像处理和创意设计应用" },
    SeedCategory { name: "社交网络", icon: "🌐", description: "社交通讯和网络应用" },
];

const APPS: [SeedApp; 6] = [
    SeedApp {
        category: 0,
        name: "小蜜蜂游戏",
        package_name: "com.rokid.bee.game",
        version: "1.0.0",
        icon: "🐝",
        download_url: "https://github.com/jingbao-store/releases/download/v1.0.0/bee-game.apk",
        file_size_bytes: 13_631_488,
        developer: "Rokid",
        rating: 4.5,
        downloads: 1250,
        days_ago: 15,
        min_android_version: "8.0",
        permissions: &["网络访问", "存储权限"],
        features: &["手势控制", "语音操作", "多关卡挑战"],
    },
    SeedApp {
        category: 0,
        name: "太空冒险",
        package_name: "com.jingbao.space.adventure",
        version: "2.1.0",
        icon: "🚀",
        download_url: "https://example.com/space-adventure.apk",
        file_size_bytes: 26_214_400,
        developer: "Space Games Studio",
        rating: 4.8,
        downloads: 3420,
        days_ago: 7,
        min_android_version: "9.0",
        permissions: &["网络访问", "存储权限", "传感器访问"],
        features: &["3D图形", "关卡系统", "成就系统"],
    },
    SeedApp {
        category: 1,
        name: "AR视频播放器",
        package_name: "com.jingbao.ar.player",
        version: "2.5.1",
        icon: "📺",
        download_url: "https://example.com/ar-player.apk",
        file_size_bytes: 18_874_368,
        developer: "AR Media Labs",
        rating: 4.6,
        downloads: 5680,
        days_ago: 3,
        min_android_version: "8.0",
        permissions: &["存储权限", "网络访问"],
        features: &["多格式支持", "字幕显示", "手势控制", "播放列表"],
    },
    SeedApp {
        category: 3,
        name: "AR录像工具",
        package_name: "com.jingbao.ar.recorder",
        version: "1.4.0",
        icon: "📹",
        download_url: "https://example.com/ar-recorder.apk",
        file_size_bytes: 15_728_640,
        developer: "JingBao Tools",
        rating: 4.5,
        downloads: 4210,
        days_ago: 5,
        min_android_version: "9.0",
        permissions: &["相机", "麦克风", "存储权限"],
        features: &["高清录制", "实时预览", "滤镜效果"],
    },
    SeedApp {
        category: 5,
        name: "蓝牙键盘助手",
        package_name: "io.appground.blek",
        version: "1.2.0",
        icon: "⌨️",
        download_url: "https://play.google.com/store/apps/details?id=io.appground.blek",
        file_size_bytes: 8_388_608,
        developer: "AppGround",
        rating: 4.4,
        downloads: 12500,
        days_ago: 20,
        min_android_version: "7.0",
        permissions: &["蓝牙", "网络访问"],
        features: &["多种键盘布局", "自定义快捷键", "手势支持"],
    },
    SeedApp {
        category: 5,
        name: "虚拟鼠标控制器",
        package_name: "com.jingbao.virtual.mouse",
        version: "3.0.2",
        icon: "🖱️",
        download_url: "https://example.com/virtual-mouse.apk",
        file_size_bytes: 6_291_456,
        developer: "JingBao Team",
        rating: 4.7,
        downloads: 8930,
        days_ago: 10,
        min_android_version: "8.0",
        permissions: &["蓝牙", "网络访问"],
        features: &["触摸板模式", "手势操作", "按键自定义", "多设备支持"],
    },
];

/// Seeds the demo catalog unless categories already exist. Returns whether
/// anything was written.
pub fn seed_if_empty(db: &Database) -> CatalogResult<bool> {
    let mut conn = db.connect()?;
    if categories::count(&conn)? > 0 {
        info!("catalog already populated, skipping seed");
        return Ok(false);
    }

    let now = Utc::now();
    let mut ids = Vec::with_capacity(CATEGORIES.len());
    for (position, seed) in CATEGORIES.iter().enumerate() {
        let mut category = Category {
            id: 0,
            name: seed.name.to_string(),
            slug: String::new(),
            icon: Some(seed.icon.to_string()),
            description: Some(seed.description.to_string()),
            display_order: position as i64 + 1,
            created_at: now,
            updated_at: now,
        };
        categories::assign_slug(&conn, &mut category, None, true)?;
        categories::insert(&conn, &mut category)?;
        ids.push(category.id);
    }

    let today = now.date_naive();
    for seed in APPS.iter() {
        let mut app = Application::new(ids[seed.category]);
        app.name = seed.name.to_string();
        app.package_name = seed.package_name.to_string();
        app.version = Some(seed.version.to_string());
        app.icon = Some(seed.icon.to_string());
        app.download_url = Some(seed.download_url.to_string());
        app.file_size_bytes = i64::try_from(seed.file_size_bytes).ok();
        app.file_size = Some(common::file_size::format_file_size(Some(seed.file_size_bytes)));
        app.developer = Some(seed.developer.to_string());
        app.rating = Some(seed.rating);
        app.downloads = seed.downloads;
        app.last_updated = Some(today - Duration::days(seed.days_ago));
        app.min_android_version = Some(seed.min_android_version.to_string());
        app.set_permissions_array(&to_strings(seed.permissions));
        app.set_features_array(&to_strings(seed.features));
        applications::insert(&mut conn, &mut app)?;
    }

    info!("seeded {} categories and {} applications", CATEGORIES.len(), APPS.len());
    Ok(true)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
