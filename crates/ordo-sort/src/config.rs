//! Runtime toggles for the PV-node carve-outs in capture classification and
//! quiet scoring.

/// Ordering options. Every toggle only has an effect in PV nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingConfig {
    /// Treat a losing capture of an advanced passed pawn as good.
    pub passer_sacrifices: bool,
    /// Treat a losing capture whose piece then attacks the enemy king as good.
    pub king_attack_sacrifices: bool,
    /// Treat a losing capture next to the enemy king as good.
    pub king_box_sacrifices: bool,
    /// Treat every queen promotion as good.
    pub pv_queen_promotions: bool,
    /// Give safe quiet moves that attack the enemy king a small bonus.
    pub quiet_king_attacks: bool,
}

impl OrderingConfig {
    pub const DEFAULT: OrderingConfig = OrderingConfig {
        passer_sacrifices: true,
        king_attack_sacrifices: false,
        king_box_sacrifices: false,
        pv_queen_promotions: false,
        quiet_king_attacks: false,
    };

    /// Return `true` if any sacrifice carve-out is enabled.
    pub fn any_sacrifice(&self) -> bool {
        self.passer_sacrifices || self.king_attack_sacrifices || self.king_box_sacrifices
    }
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
