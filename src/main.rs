use std::env;
use std::process;

use screenplay_formats::{export_file, import_file, Screenplay};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: {} <input> [output]", args[0]);
        println!("  输入: .fountain/.txt, .fdx/.xml, .html/.htm");
        println!("  输出: .fountain/.txt, .fdx/.xml");
        return;
    }

    let mut doc = Screenplay::new();
    let result = import_file(&args[1], &mut doc);
    if !result.success {
        println!("导入失败: {}", result.message);
        process::exit(1);
    }

    println!("导入完成！");
    println!("场景数量: {}", doc.scene_count());
    println!("段落数量: {}", doc.scene_element_count());
    println!("角色数量: {}", doc.collect_character_names().len());
    if !doc.title.is_empty() {
        println!("标题: {}", doc.title);
    }

    if args.len() > 2 {
        let result = export_file(&args[2], &doc);
        if !result.success {
            println!("导出失败: {}", result.message);
            process::exit(1);
        }
        println!("已导出到: {}", args[2]);
    }
}
