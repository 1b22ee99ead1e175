use crate::render::{escape_html, DisplayFragment};

/// A scheduled club hike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hike {
    pub title: &'static str,
    pub date: &'static str,
    pub distance: &'static str,
    pub difficulty: &'static str,
    pub description: &'static str,
}

pub const UPCOMING_HIKES: [Hike; 6] = [
    Hike {
        title: "White's Junction Trail Loop",
        date: "Saturday, July 20, 2024",
        distance: "5 km",
        difficulty: "Easy",
        description: "A gentle loop perfect for families and beginners. Enjoy well-maintained paths through a mix of forest and open fields.",
    },
    Hike {
        title: "Clifford Rotary Park Trail",
        date: "Sunday, July 28, 2024",
        distance: "3.5 km",
        difficulty: "Easy",
        description: "A beautiful, accessible walk along the river. Great for a quick morning hike and bird watching.",
    },
    Hike {
        title: "Harriston Greenway Full Circuit",
        date: "Saturday, August 10, 2024",
        distance: "8 km",
        difficulty: "Moderate",
        description: "Explore the full length of the Harriston Greenway. This trail offers varied scenery and a slightly longer distance for a good workout.",
    },
    Hike {
        title: "Minto-Saugeen Exploration",
        date: "Saturday, August 24, 2024",
        distance: "12 km",
        difficulty: "Challenging",
        description: "A more demanding hike for experienced members, connecting local trails for a longer, more rugged adventure.",
    },
    Hike {
        title: "Fall Colours at White's Junction",
        date: "Saturday, October 5, 2024",
        distance: "5 km",
        difficulty: "Easy",
        description: "Revisit this popular trail to experience the spectacular autumn colours. A perfect photo opportunity!",
    },
    Hike {
        title: "Historic Palmerston Railway Hike",
        date: "Sunday, October 20, 2024",
        distance: "7 km",
        difficulty: "Moderate",
        description: "Walk along the old railway lines near Palmerston, discovering local history and enjoying the crisp autumn air.",
    },
];

/// One `<li>` card; the reveal delay cycles 1, 2, 3 across the grid.
pub fn render_hike_card(index: usize, hike: &Hike) -> DisplayFragment {
    DisplayFragment::new(format!(
        r#"<li class="hike-card reveal delay-{}">
    <h3>{}</h3>
    <div class="info-item date">
        <span class="material-symbols-outlined">calendar_month</span>
        <span>{}</span>
    </div>
    <div class="info-item">
        <span class="material-symbols-outlined">straighten</span>
        <span>{}</span>
    </div>
    <div class="info-item">
        <span class="material-symbols-outlined">trending_up</span>
        <span>{}</span>
    </div>
    <p class="description">{}</p>
</li>"#,
        index % 3 + 1,
        escape_html(hike.title),
        escape_html(hike.date),
        escape_html(hike.distance),
        escape_html(hike.difficulty),
        escape_html(hike.description),
    ))
}

pub fn render_hikes_grid(hikes: &[Hike]) -> Vec<DisplayFragment> {
    hikes
        .iter()
        .enumerate()
        .map(|(index, hike)| render_hike_card(index, hike))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_has_a_card_per_hike() {
        let cards = render_hikes_grid(&UPCOMING_HIKES);
        assert_eq!(cards.len(), UPCOMING_HIKES.len());
        assert!(cards[0].as_str().contains("White&#39;s Junction Trail Loop"));
        assert!(cards[3].as_str().contains("12 km"));
    }

    #[test]
    fn test_reveal_delay_cycles() {
        let cards = render_hikes_grid(&UPCOMING_HIKES);
        let delays: Vec<bool> = cards
            .iter()
            .enumerate()
            .map(|(i, card)| {
                card.as_str()
                    .starts_with(&format!(r#"<li class="hike-card reveal delay-{}">"#, i % 3 + 1))
            })
            .collect();
        assert!(delays.iter().all(|ok| *ok));
    }
}
