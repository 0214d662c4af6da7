//! The fifteen built-in levels, grouped by the concept they introduce.

use ruko_types::ast::BlockKind::{self, Break, Collect, Down, Function, If, Left, Loop, Right, Up, Wait};
use ruko_types::level::{GoalRule, Level};
use ruko_types::world::{CollectibleKind, Pos, World};

/// Side length of every built-in grid.
pub const GRID_SIZE: u32 = 6;

// ══════════════════════════════════════════════════════════════════════════════
// Palettes
// ══════════════════════════════════════════════════════════════════════════════

const MOVES: &[BlockKind] = &[Up, Down, Left, Right];
const LOOPS: &[BlockKind] = &[Up, Down, Left, Right, Loop];
const COLLECTING: &[BlockKind] = &[Up, Down, Left, Right, Collect, Loop];
const DECISIONS: &[BlockKind] = &[Up, Down, Left, Right, Collect, Loop, If];
const WALL_SENSING: &[BlockKind] = &[Up, Down, Left, Right, Loop, If];
const BREAKING: &[BlockKind] = &[Up, Down, Left, Right, Collect, Loop, If, Break];
const FUNCTIONS: &[BlockKind] = &[Up, Down, Left, Right, Collect, Loop, If, Function, Break];
const PATTERNS: &[BlockKind] = &[Up, Down, Left, Right, Loop, If, Function, Break];
const EVERYTHING: &[BlockKind] = &[Up, Down, Left, Right, Collect, Loop, If, Function, Wait, Break];

// ══════════════════════════════════════════════════════════════════════════════
// Catalog
// ══════════════════════════════════════════════════════════════════════════════

/// Ordered registry of the built-in levels.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    pub fn new() -> Self {
        let mut catalog = Self { levels: Vec::new() };
        catalog.register_sequences();
        catalog.register_loops();
        catalog.register_conditionals();
        catalog.register_functions();
        catalog.register_challenges();
        catalog
    }

    pub fn get(&self, id: u32) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn into_levels(self) -> Vec<Level> {
        self.levels
    }

    fn add(&mut self, draft: Draft) {
        self.levels.push(draft.0);
    }

    // ──────────────────────────────────────────────────────────────────────
    // Levels 1-3: sequences
    // ──────────────────────────────────────────────────────────────────────

    fn register_sequences(&mut self) {
        self.add(
            Draft::new(1, "First Steps", 4, MOVES, grid((1, 2), (3, 2)))
                .about("Basic Movement", "Welcome! Move Ruko to the battery.")
                .hints(&["The battery is 2 spaces to the right", "Use 2 RIGHT arrows"]),
        );
        self.add(
            Draft::new(2, "Two Turns", 6, MOVES, grid((1, 1), (4, 3)))
                .about("Sequences", "Navigate around! Use multiple directions."),
        );
        self.add(
            Draft::new(
                3,
                "The Long Path",
                12,
                MOVES,
                grid((0, 0), (5, 5)).with_walls(cells(&[(2, 1), (4, 3)])),
            )
            .about("Longer Sequences", "This requires many moves in sequence."),
        );
    }

    // ──────────────────────────────────────────────────────────────────────
    // Levels 4-7: loops
    // ──────────────────────────────────────────────────────────────────────

    fn register_loops(&mut self) {
        self.add(
            Draft::new(4, "Repeat Discovery", 8, LOOPS, grid((1, 3), (5, 3)))
                .about(
                    "Loop Introduction",
                    "Try the new LOOP block! Same path, fewer blocks.",
                )
                .hints(&[
                    "Use LOOP 4× with RIGHT inside",
                    "You can combine loops with regular moves",
                ]),
        );
        self.add(
            Draft::new(5, "Nested Journey", 6, LOOPS, grid((0, 0), (5, 2)))
                .about("Loop Mastery", "Use multiple loops efficiently!"),
        );
        self.add(
            Draft::new(
                6,
                "Obstacle Course",
                8,
                LOOPS,
                grid((0, 0), (5, 5)).with_walls(cells(&[
                    (2, 0),
                    (2, 1),
                    (2, 2),
                    (4, 3),
                    (4, 4),
                    (4, 5),
                ])),
            )
            .about("Walls & Loops", "Walls appear! Plan carefully with loops."),
        );
        self.add(
            Draft::new(
                7,
                "Collector",
                15,
                COLLECTING,
                items(grid((0, 0), (5, 5)), &[(2, 0), (2, 3), (4, 4)]),
            )
            .about("Multiple Goals", "Collect all coins, then reach the battery!")
            .collect_all(),
        );
    }

    // ──────────────────────────────────────────────────────────────────────
    // Levels 8-10: conditionals
    // ──────────────────────────────────────────────────────────────────────

    fn register_conditionals(&mut self) {
        self.add(
            Draft::new(
                8,
                "Smart Decisions",
                10,
                DECISIONS,
                items(grid((0, 0), (5, 5)), &[(3, 0), (3, 3)]),
            )
            .about("IF Blocks", "Sometimes you need to make decisions!")
            .hints(&[
                "Use IF ITEM_HERE with COLLECT inside",
                "You don't need to know exactly where items are!",
            ])
            .collect_all(),
        );
        self.add(
            Draft::new(
                9,
                "Wall Detection",
                12,
                WALL_SENSING,
                grid((0, 3), (5, 2)).with_walls(cells(&[(2, 3), (2, 4), (4, 1), (4, 2)])),
            )
            .about("IF with Obstacles", "Detect walls before hitting them!"),
        );
        self.add(
            Draft::new(
                10,
                "Treasure Hunt",
                16,
                BREAKING,
                items(
                    grid((0, 0), (5, 5)).with_walls(cells(&[
                        (1, 1),
                        (2, 1),
                        (4, 1),
                        (1, 3),
                        (3, 3),
                        (4, 3),
                        (2, 4),
                        (4, 5),
                    ])),
                    &[(3, 0), (0, 2), (5, 2), (2, 5)],
                ),
            )
            .about("Complex Conditionals", "Navigate maze, collect treasures!")
            .collect_all(),
        );
    }

    // ──────────────────────────────────────────────────────────────────────
    // Levels 11-12: functions
    // ──────────────────────────────────────────────────────────────────────

    fn register_functions(&mut self) {
        self.add(
            Draft::new(
                11,
                "Function Power",
                14,
                FUNCTIONS,
                items(grid((0, 0), (5, 5)), &[(1, 1), (2, 2), (4, 4)]),
            )
            .about(
                "Reusable Code",
                "Create a function to reuse complex patterns!",
            )
            .collect_all(),
        );
        self.add(
            Draft::new(
                12,
                "Pattern Master",
                10,
                PATTERNS,
                grid((0, 5), (5, 0)).with_walls(cells(&[
                    (1, 5),
                    (2, 4),
                    (3, 3),
                    (4, 2),
                    (5, 1),
                ])),
            )
            .about(
                "Function Optimization",
                "Find the repeating pattern and functionize it!",
            ),
        );
    }

    // ──────────────────────────────────────────────────────────────────────
    // Levels 13-15: master challenges
    // ──────────────────────────────────────────────────────────────────────

    fn register_challenges(&mut self) {
        self.add(
            Draft::new(
                13,
                "The Gauntlet",
                20,
                EVERYTHING,
                items(
                    grid((0, 0), (5, 5)).with_walls(cells(&[
                        (2, 1),
                        (2, 2),
                        (4, 0),
                        (4, 1),
                        (1, 4),
                        (3, 4),
                        (4, 4),
                        (5, 3),
                    ])),
                    &[(1, 2), (3, 0), (5, 1), (0, 5), (3, 3)],
                ),
            )
            .about(
                "Everything Combined",
                "Use all your skills to master this complex maze!",
            )
            .collect_all(),
        );
        self.add(
            Draft::new(
                14,
                "Efficiency Expert",
                12,
                FUNCTIONS,
                items(
                    grid((0, 0), (5, 5)).with_walls(cells(&[
                        (1, 1),
                        (1, 2),
                        (3, 3),
                        (3, 4),
                        (5, 1),
                        (0, 4),
                        (4, 0),
                        (2, 5),
                    ])),
                    &[(2, 0), (2, 3), (4, 3), (5, 4)],
                ),
            )
            .about("Code Golf", "Same as before, but use MINIMAL blocks!")
            .collect_all(),
        );
        self.add(
            Draft::new(
                15,
                "Final Boss",
                25,
                EVERYTHING,
                items(
                    grid((0, 0), (5, 5)).with_walls(cells(&[
                        (1, 0),
                        (3, 1),
                        (1, 2),
                        (4, 2),
                        (2, 3),
                        (0, 4),
                        (3, 4),
                        (4, 5),
                    ])),
                    &[(2, 0), (0, 2), (5, 1), (3, 3), (1, 5), (5, 3)],
                ),
            )
            .about("Ultimate Challenge", "The ultimate programming puzzle!")
            .collect_all(),
        );
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Builders
// ══════════════════════════════════════════════════════════════════════════════

struct Draft(Level);

impl Draft {
    fn new(id: u32, name: &str, max_blocks: usize, palette: &[BlockKind], world: World) -> Self {
        let mut level = Level::sandbox(world, max_blocks);
        level.id = id;
        level.name = name.to_string();
        level.available_blocks = palette.to_vec();
        Self(level)
    }

    fn about(mut self, concept: &str, tutorial: &str) -> Self {
        self.0.concept = concept.to_string();
        self.0.tutorial = tutorial.to_string();
        self
    }

    fn hints(mut self, hints: &[&str]) -> Self {
        self.0.hints = hints.iter().map(|hint| hint.to_string()).collect();
        self
    }

    fn collect_all(self) -> Self {
        Self(self.0.with_goal(GoalRule::ReachGoalWithAllItems))
    }
}

fn grid(start: (i32, i32), goal: (i32, i32)) -> World {
    World::new(GRID_SIZE, Pos::new(start.0, start.1), Pos::new(goal.0, goal.1))
}

fn cells(coords: &[(i32, i32)]) -> Vec<Pos> {
    coords.iter().map(|&(x, y)| Pos::new(x, y)).collect()
}

/// Place items at `coords`, cycling coin, gem, key.
fn items(world: World, coords: &[(i32, i32)]) -> World {
    cells(coords)
        .into_iter()
        .zip(CollectibleKind::CYCLE.iter().cycle())
        .fold(world, |world, (pos, &kind)| world.with_collectible(pos, kind))
}
