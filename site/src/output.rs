use colored::*;
use trailfinder_site::controller::ControlView;
use trailfinder_site::DisplayFragment;

/// Print a fragment as HTML or as terminal text
pub fn print_fragment(fragment: &DisplayFragment, html: bool) {
    if html {
        println!("{}", fragment);
        return;
    }

    let text = fragment.plain_text();
    let mut lines = text.lines();
    if let Some(heading) = lines.next() {
        println!("{}", heading.green().bold());
    }
    for line in lines {
        println!("  {}", line);
    }
}

/// Show the submit control as it would appear on the page
pub fn print_control(control: &ControlView) {
    if control.loading {
        eprintln!("{}", control.label.yellow());
    }
}
